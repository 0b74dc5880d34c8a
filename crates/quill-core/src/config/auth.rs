//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// The access and refresh TTLs double as the `Max-Age` values of the
/// corresponding cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Minimum password length for registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Access token lifetime in seconds (cookie Max-Age).
    pub fn access_ttl_seconds(&self) -> u64 {
        self.access_ttl_minutes * 60
    }

    /// Refresh token lifetime in seconds (cookie Max-Age).
    pub fn refresh_ttl_seconds(&self) -> u64 {
        self.refresh_ttl_days * 86400
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_seconds() {
        let config = AuthConfig {
            jwt_secret: "secret".into(),
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
            password_min_length: 8,
        };
        assert_eq!(config.access_ttl_seconds(), 1800);
        assert_eq!(config.refresh_ttl_seconds(), 604800);
    }
}
