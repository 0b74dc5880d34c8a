//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use quill_core::config::auth::AuthConfig;
use quill_core::error::AppError;

use super::claims::Claims;

/// Validates JWT tokens.
///
/// Signature verification happens before any claim is inspected; a
/// tampered token is never partially trusted. All decode failures
/// normalize to `Authentication` errors so raw library errors never
/// leak to callers.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock-skew tolerance

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature, expiry, and that the token does NOT carry the
    /// refresh discriminant. A refresh token is never accepted where an
    /// access token is expected.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.is_refresh() {
            return Err(AppError::authentication(
                "Invalid token type: expected access token",
            ));
        }

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    ///
    /// Checks signature, expiry, and that the refresh discriminant is
    /// present.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_refresh() {
            return Err(AppError::authentication(
                "Invalid token type: expected refresh token",
            ));
        }

        Ok(claims)
    }

    /// Internal decode without type checking.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::TokenType;
    use crate::jwt::encoder::JwtEncoder;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use quill_core::error::ErrorKind;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
            password_min_length: 8,
        }
    }

    #[test]
    fn test_round_trip() {
        let encoder = JwtEncoder::new(&config());
        let decoder = JwtDecoder::new(&config());

        let pair = encoder.generate_token_pair("alice").unwrap();

        let access = decoder.decode_access_token(&pair.access_token).unwrap();
        assert_eq!(access.sub, "alice");
        assert!(!access.is_refresh());

        let refresh = decoder.decode_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, "alice");
        assert!(refresh.is_refresh());
    }

    #[test]
    fn test_expired_token_rejected_despite_valid_signature() {
        let decoder = JwtDecoder::new(&config());

        // Signed with the right secret but expired well past the leeway.
        let claims = Claims {
            sub: "alice".into(),
            iat: chrono::Utc::now().timestamp() - 7200,
            exp: chrono::Utc::now().timestamp() - 3600,
            token_type: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = decoder.decode_access_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let decoder = JwtDecoder::new(&config());

        let claims = Claims {
            sub: "alice".into(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 3600,
            token_type: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();

        assert!(decoder.decode_access_token(&token).is_err());
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        let encoder = JwtEncoder::new(&config());
        let decoder = JwtDecoder::new(&config());

        let pair = encoder.generate_token_pair("alice").unwrap();

        let err = decoder.decode_access_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_access_token_rejected_as_refresh_token() {
        let encoder = JwtEncoder::new(&config());
        let decoder = JwtDecoder::new(&config());

        let pair = encoder.generate_token_pair("alice").unwrap();

        let err = decoder
            .decode_refresh_token(&pair.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let decoder = JwtDecoder::new(&config());
        assert!(decoder.decode_access_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_forged_discriminant_requires_valid_signature() {
        // A refresh-typed token signed with the wrong key fails on
        // signature before the discriminant is ever consulted.
        let decoder = JwtDecoder::new(&config());

        let claims = Claims {
            sub: "alice".into(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 3600,
            token_type: Some(TokenType::Refresh),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"wrong"),
        )
        .unwrap();

        assert!(decoder.decode_refresh_token(&token).is_err());
    }
}
