use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token; also used as the cookie `Max-Age`.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT_SECRET is not configured")]
    MissingSecret,
    /// Malformed, forged and expired tokens all collapse into this variant.
    #[error("token is invalid or expired")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: String,
    pub name: String,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 identity tokens.
#[derive(Clone)]
pub struct TokenService {
    keys: Option<Arc<Keys>>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: Option<&str>) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|secret| {
            Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            })
        });
        Self { keys }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    pub fn issue(&self, user_id: &str, name: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, name, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;
        let iat = now.timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            name: name.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Expiry is checked against `now` rather than the wall clock so tests can move time.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenIdentity, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|err| {
                tracing::debug!(error = %err, "Token rejected");
                TokenError::Invalid
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Invalid);
        }

        Ok(TokenIdentity {
            user_id: claims.user_id,
            name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(Some("unit-test-secret"))
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let tokens = service();
        let token = tokens.issue("admin", "Blog Owner").expect("issue");
        let identity = tokens.verify(&token).expect("verify");
        assert_eq!(identity.user_id, "admin");
        assert_eq!(identity.name, "Blog Owner");
    }

    #[test]
    fn token_expires_exactly_one_hour_after_issue() {
        let tokens = service();
        let issued_at = Utc::now();
        let token = tokens.issue_at("admin", "Owner", issued_at).expect("issue");

        let just_before = issued_at + Duration::seconds(TOKEN_TTL_SECONDS - 1);
        assert!(tokens.verify_at(&token, just_before).is_ok());

        let at_expiry = issued_at + Duration::seconds(TOKEN_TTL_SECONDS);
        assert!(matches!(
            tokens.verify_at(&token, at_expiry),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn payload_uses_camel_case_user_id() {
        let tokens = service();
        let token = tokens.issue("admin", "Owner").expect("issue");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let raw = decode::<serde_json::Value>(&token, &DecodingKey::from_secret(&[]), &validation)
            .expect("decode")
            .claims;
        assert_eq!(raw["userId"], "admin");
        assert_eq!(raw["name"], "Owner");
        assert_eq!(
            raw["exp"].as_i64().unwrap() - raw["iat"].as_i64().unwrap(),
            TOKEN_TTL_SECONDS
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let token = TokenService::new(Some("other-secret"))
            .issue("admin", "Owner")
            .expect("issue");
        assert!(matches!(service().verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            service().verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(service().verify(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn missing_secret_fails_closed() {
        let tokens = TokenService::new(None);
        assert!(!tokens.is_configured());
        assert!(matches!(
            tokens.issue("admin", "Owner"),
            Err(TokenError::MissingSecret)
        ));
        assert!(matches!(
            tokens.verify("whatever"),
            Err(TokenError::MissingSecret)
        ));
        assert!(!TokenService::new(Some("")).is_configured());
    }

    #[test]
    fn debug_output_does_not_leak_secret() {
        let rendered = format!("{:?}", service());
        assert!(!rendered.contains("unit-test-secret"));
        assert!(rendered.contains("configured: true"));
    }
}
