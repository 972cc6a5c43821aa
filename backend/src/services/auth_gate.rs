use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::admin::{AdminIdentity, AuthStatus},
    repositories::admin::AdminStore,
    utils::jwt::{TokenError, TokenService},
};

/// Outcome of checking a request's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No credential was presented.
    Anonymous,
    /// A credential was presented but does not resolve to the admin.
    Denied,
    Admin(AdminIdentity),
}

impl GateDecision {
    pub fn identity(&self) -> Option<&AdminIdentity> {
        match self {
            GateDecision::Admin(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn into_status(self) -> AuthStatus {
        match self {
            GateDecision::Admin(identity) => AuthStatus::authenticated(identity),
            GateDecision::Anonymous | GateDecision::Denied => AuthStatus::anonymous(),
        }
    }
}

/// Decides whether a request carries a valid admin credential.
///
/// Every call verifies the token and then asks the identity store; nothing is
/// cached. Only a missing signing secret surfaces as an error.
#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
    admins: Arc<dyn AdminStore>,
}

impl AuthGate {
    pub fn new(tokens: TokenService, admins: Arc<dyn AdminStore>) -> Self {
        Self { tokens, admins }
    }

    pub async fn check(&self, token: Option<&str>) -> Result<GateDecision, AppError> {
        self.check_at(token, Utc::now()).await
    }

    pub async fn check_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GateDecision, AppError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(GateDecision::Anonymous);
        };

        let claims = match self.tokens.verify_at(token, now) {
            Ok(claims) => claims,
            Err(TokenError::MissingSecret) => {
                return Err(AppError::Configuration(
                    TokenError::MissingSecret.to_string(),
                ))
            }
            Err(_) => return Ok(GateDecision::Denied),
        };

        match self.admins.resolve_identity(&claims.user_id).await {
            Ok(Some(identity)) => Ok(GateDecision::Admin(identity)),
            Ok(None) => {
                tracing::debug!(user_id = %claims.user_id, "Token subject is not a known admin");
                Ok(GateDecision::Denied)
            }
            Err(err) => {
                tracing::warn!(
                    user_id = %claims.user_id,
                    error = %err,
                    "Identity lookup failed; treating request as unauthenticated"
                );
                Ok(GateDecision::Denied)
            }
        }
    }
}
