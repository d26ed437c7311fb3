//! Bearer tokens
//!
//! Signed JSON Web Tokens asserting an account identity. A token carries the
//! account id in `sub` and is only accepted until `exp`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The contents of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, as a string per the JWT convention for `sub`.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// A freshly issued token and when it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token creation failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Token subject is not an account id")]
    InvalidSubject,
}

/// Issues and verifies bearer tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: Algorithm, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            lifetime,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_algorithm,
            Duration::minutes(config.access_token_expire_minutes),
        )
    }

    /// Issue a token for `account_id`, valid from now.
    pub fn issue(&self, account_id: i64) -> Result<IssuedToken, TokenError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        account_id: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at + self.lifetime;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate signature and expiry, returning the account id it asserts.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            }
        })?;

        data.claims
            .sub
            .parse()
            .map_err(|_| TokenError::InvalidSubject)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Algorithm::HS256, Duration::minutes(60))
    }

    #[test]
    fn test_issue_then_verify_returns_account_id() {
        let service = service();
        let issued = service.issue(42).unwrap();

        assert_eq!(service.verify(&issued.token).unwrap(), 42);
    }

    #[test]
    fn test_expiry_is_lifetime_after_issue() {
        let now = Utc::now();
        let issued = service().issue_at(1, now).unwrap();

        assert_eq!(issued.expires_at, now + Duration::minutes(60));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let issued = service
            .issue_at(7, Utc::now() - Duration::minutes(61))
            .unwrap();

        assert!(matches!(service.verify(&issued.token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = service().issue(7).unwrap();
        let other = TokenService::new(b"other-secret", Algorithm::HS256, Duration::minutes(60));

        assert!(matches!(other.verify(&issued.token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let issued = TokenService::new(b"test-secret", Algorithm::HS512, Duration::minutes(60))
            .issue(7)
            .unwrap();

        assert!(matches!(service().verify(&issued.token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let issued = service.issue(7).unwrap();

        let forged_claims = Claims {
            sub: "8".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(60)).timestamp(),
        };
        let forged_payload = jsonwebtoken::encode(
            &Header::default(),
            &forged_claims,
            &EncodingKey::from_secret(b"attacker"),
        )
        .unwrap();
        let forged_body = forged_payload.split('.').nth(1).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        parts[1] = forged_body;

        assert!(matches!(service.verify(&parts.join(".")), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(service().verify("not.a.token"), Err(TokenError::Invalid(_))));
        assert!(matches!(service().verify(""), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
            .unwrap();

        assert!(matches!(service().verify(&token), Err(TokenError::InvalidSubject)));
    }
}
