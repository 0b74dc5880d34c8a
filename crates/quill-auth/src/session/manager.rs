//! Session lifecycle manager: login, refresh, and request resolution.
//!
//! Sessions are stateless. Both tokens are self-contained JWTs and no
//! server-side session record exists, so logout is purely cookie
//! clearing at the HTTP layer. A stolen, unexpired token therefore
//! remains valid until natural expiry; this is an accepted limitation
//! of the design, not a bug.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use quill_core::error::AppError;
use quill_database::repositories::user::UserRepository;
use quill_entity::user::User;

use crate::jwt::claims::Claims;
use crate::jwt::decoder::JwtDecoder;
use crate::jwt::encoder::{JwtEncoder, TokenPair};
use crate::password::hasher::PasswordHasher;

/// Outcome of resolving a request's credential cookies.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A valid access token resolved to this user.
    Authenticated(User),
    /// The access token is absent or no longer valid, but a refresh
    /// cookie is present: the client should take one redirect hop
    /// through the refresh endpoint.
    NeedsRefresh,
}

/// State of the access cookie after decoding, used by the resolution
/// state machine.
#[derive(Debug)]
enum AccessState {
    /// No access cookie on the request.
    Missing,
    /// Access cookie decoded and validated.
    Valid(Claims),
    /// Access cookie present but expired, malformed, or mistyped.
    Invalid,
}

/// Pure decision of the credential state machine, before any user
/// lookup.
#[derive(Debug, PartialEq, Eq)]
enum Decision {
    /// Resolve the subject of the valid access token.
    Resolve,
    /// Signal the refresh flow.
    NeedsRefresh,
    /// No usable credentials.
    Unauthenticated,
}

/// Classify the credential combination.
///
/// | access          | refresh | decision        |
/// |-----------------|---------|-----------------|
/// | absent          | absent  | Unauthenticated |
/// | absent          | present | NeedsRefresh    |
/// | valid           | any     | Resolve         |
/// | invalid/expired | present | NeedsRefresh    |
/// | invalid/expired | absent  | Unauthenticated |
fn classify(access: &AccessState, has_refresh: bool) -> Decision {
    match (access, has_refresh) {
        (AccessState::Valid(_), _) => Decision::Resolve,
        (AccessState::Missing, false) => Decision::Unauthenticated,
        (AccessState::Missing, true) => Decision::NeedsRefresh,
        (AccessState::Invalid, true) => Decision::NeedsRefresh,
        (AccessState::Invalid, false) => Decision::Unauthenticated,
    }
}

/// Manages login, token refresh, and per-request identity resolution.
#[derive(Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    jwt_encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    jwt_decoder: Arc<JwtDecoder>,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        user_repo: Arc<UserRepository>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            jwt_encoder,
            jwt_decoder,
            user_repo,
            password_hasher,
        }
    }

    /// Performs the login flow: verify credentials, record the login,
    /// and issue both tokens.
    ///
    /// Unknown username and wrong password fail identically so callers
    /// cannot enumerate accounts.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(TokenPair, User), AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            return Err(AppError::invalid_credentials());
        }

        self.user_repo.update_last_login(user.id).await?;

        let tokens = self.jwt_encoder.generate_token_pair(&user.username)?;

        info!(username = %user.username, "User logged in");
        Ok((tokens, user))
    }

    /// Issues a token pair without credential verification, for flows
    /// that have already established identity (registration).
    pub fn issue_tokens(&self, username: &str) -> Result<TokenPair, AppError> {
        self.jwt_encoder.generate_token_pair(username)
    }

    /// Mints a new access token from a refresh token.
    ///
    /// The refresh discriminant is re-checked after decode, and the
    /// subject must still resolve to an existing user. The refresh
    /// token itself is NOT rotated.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = self.jwt_decoder.decode_refresh_token(refresh_token)?;

        let user = self
            .user_repo
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        self.jwt_encoder.generate_access_token(&user.username)
    }

    /// Resolves the current user from the request's credential cookies.
    ///
    /// Performs at most one user lookup; everything else is local token
    /// validation.
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Resolution, AppError> {
        let access_state = match access_token {
            None => AccessState::Missing,
            Some(token) => match self.jwt_decoder.decode_access_token(token) {
                Ok(claims) => AccessState::Valid(claims),
                Err(_) => AccessState::Invalid,
            },
        };

        match classify(&access_state, refresh_token.is_some()) {
            Decision::Unauthenticated => {
                Err(AppError::authentication("Authentication required"))
            }
            Decision::NeedsRefresh => Ok(Resolution::NeedsRefresh),
            Decision::Resolve => {
                let AccessState::Valid(claims) = access_state else {
                    unreachable!("Resolve decision implies a valid access token");
                };
                let user = self
                    .user_repo
                    .find_by_username(&claims.sub)
                    .await?
                    .ok_or_else(|| AppError::authentication("Authentication required"))?;
                Ok(Resolution::Authenticated(user))
            }
        }
    }

    /// Records a logout. Token invalidation is purely client-side
    /// cookie clearing; see the module docs for the accepted
    /// limitation.
    pub fn logout(&self, username: &str) {
        info!(username = %username, "User logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_claims() -> Claims {
        Claims {
            sub: "alice".into(),
            iat: 0,
            exp: i64::MAX,
            token_type: None,
        }
    }

    #[test]
    fn test_state_machine_table() {
        // absent / absent -> Unauthenticated
        assert_eq!(
            classify(&AccessState::Missing, false),
            Decision::Unauthenticated
        );
        // absent / present -> NeedsRefresh
        assert_eq!(classify(&AccessState::Missing, true), Decision::NeedsRefresh);
        // valid / any -> Resolve
        assert_eq!(
            classify(&AccessState::Valid(valid_claims()), false),
            Decision::Resolve
        );
        assert_eq!(
            classify(&AccessState::Valid(valid_claims()), true),
            Decision::Resolve
        );
        // invalid / present -> NeedsRefresh
        assert_eq!(classify(&AccessState::Invalid, true), Decision::NeedsRefresh);
        // invalid / absent -> Unauthenticated
        assert_eq!(
            classify(&AccessState::Invalid, false),
            Decision::Unauthenticated
        );
    }
}
