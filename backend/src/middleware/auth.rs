use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    models::admin::AdminIdentity,
    services::auth_gate::GateDecision,
    state::AppState,
    utils::cookies::token_from_headers,
};

/// Guards admin-only routes. No cookie yields 401, a cookie that does not
/// resolve to the admin yields 403. On success the [`AdminIdentity`] is
/// available to handlers as an `Extension`.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = token_from_headers(request.headers());
    let decision = match state.auth_gate.check(token.as_deref()).await {
        Ok(decision) => decision,
        Err(err) => return err.into_response(),
    };

    match decision {
        GateDecision::Admin(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        GateDecision::Anonymous => {
            AppError::Unauthorized("Authentication required".to_string()).into_response()
        }
        GateDecision::Denied => {
            AppError::Forbidden("Admin privileges required".to_string()).into_response()
        }
    }
}

/// Optional admin identity for public routes that behave differently for the owner.
#[derive(Debug, Clone, Default)]
pub struct MaybeAdmin(pub Option<AdminIdentity>);

impl MaybeAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<AdminIdentity>() {
            return Ok(MaybeAdmin(Some(identity.clone())));
        }
        let token = token_from_headers(&parts.headers);
        let decision = state.auth_gate.check(token.as_deref()).await?;
        Ok(MaybeAdmin(decision.identity().cloned()))
    }
}
