//! JWT claims structure used in access and refresh tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JWT claims payload.
///
/// The subject is the username. Expiry is an absolute timestamp, so
/// verification never depends on the clock at issue time. Refresh
/// tokens carry `"type": "refresh"`; access tokens omit the field
/// entirely. The codec only verifies signature and expiry; callers must
/// re-check the discriminant so the two token purposes can never be
/// mixed up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token purpose discriminant. Absent on access tokens.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

/// Distinguishes refresh tokens from (untagged) access tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Long-lived token usable only to mint new access tokens.
    Refresh,
}

impl Claims {
    /// Whether this token carries the refresh discriminant.
    pub fn is_refresh(&self) -> bool {
        self.token_type == Some(TokenType::Refresh)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_omit_type_field() {
        let claims = Claims {
            sub: "alice".into(),
            iat: 0,
            exp: 0,
            token_type: None,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("type"));
    }

    #[test]
    fn test_refresh_claims_carry_discriminant() {
        let claims = Claims {
            sub: "alice".into(),
            iat: 0,
            exp: 0,
            token_type: Some(TokenType::Refresh),
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"type\":\"refresh\""));
        assert!(claims.is_refresh());
    }
}
