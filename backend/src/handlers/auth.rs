use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::AppendHeaders,
    Json,
};
use std::time::Duration;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        admin::{AuthStatus, LoginPayload, LoginResponse},
        MessageResponse,
    },
    state::AppState,
    utils::{
        cookies::{build_auth_cookie, build_clear_cookie, token_from_headers, CookieOptions},
        jwt::TOKEN_TTL_SECONDS,
        password::{verify_against_dummy, verify_password},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

type WithCookie<T> = (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<T>);

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginPayload>,
) -> Result<WithCookie<LoginResponse>, AppError> {
    payload.validate()?;

    let Some(credentials) = state.admins.find_credentials(&payload.username).await? else {
        verify_against_dummy(&payload.password);
        tracing::info!("Login rejected: unknown account");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&payload.password, &credentials.password_hash)? {
        tracing::info!(user_id = %credentials.id, "Login rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.tokens.issue(&credentials.id, &credentials.name)?;
    let options = CookieOptions::for_request(&headers, &state.config);
    let cookie = build_auth_cookie(
        &token,
        Duration::from_secs(TOKEN_TTL_SECONDS as u64),
        options,
    );

    tracing::info!(user_id = %credentials.id, "Admin logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            message: "Logged in".to_string(),
            user: credentials.identity(),
        }),
    ))
}

/// Clears the auth cookie with the same attributes it was set with.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> WithCookie<MessageResponse> {
    let options = CookieOptions::for_request(&headers, &state.config);
    (
        AppendHeaders([(SET_COOKIE, build_clear_cookie(options))]),
        Json(MessageResponse::new("Logged out")),
    )
}

/// Reports the caller's login state. Always 200 unless the server is misconfigured.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthStatus>, AppError> {
    let token = token_from_headers(&headers);
    let decision = state.auth_gate.check(token.as_deref()).await?;
    Ok(Json(decision.into_status()))
}
