//! Credential cookie construction.
//!
//! Both tokens travel as httponly, lax-samesite cookies. Max-Age equals
//! the corresponding token TTL, so cookies and tokens expire together.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the access token cookie.
pub const ACCESS_COOKIE: &str = "access_token";
/// Name of the refresh token cookie.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Build a credential cookie with the given lifetime.
pub fn auth_cookie(name: &'static str, value: String, max_age_seconds: u64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(max_age_seconds as i64));
    cookie
}

/// Build an immediately-expiring cookie that clears a credential.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie(ACCESS_COOKIE, "tok".into(), 1800);
        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1800)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(REFRESH_COOKIE);
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.value(), "");
    }
}
