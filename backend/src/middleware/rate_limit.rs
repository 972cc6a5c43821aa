use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_TYPE, RETRY_AFTER},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{config::RateLimitPolicy, services::rate_limit::RateLimitDecision, state::AppState};

pub const UNKNOWN_CLIENT: &str = "unknown";

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Identifies the caller for rate limiting: first `X-Forwarded-For` entry,
/// then `X-Real-IP`, then the `unknown` sentinel.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    header_str("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| header_str("x-real-ip"))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

pub fn rate_limit_key(bucket: &str, client: &str) -> String {
    format!("{}-{}", bucket, client)
}

/// Per-route fixed-window limit. Attach with
/// `from_fn_with_state((state, policy), rate_limit)` so each route gets its own bucket.
pub async fn rate_limit(
    State((state, policy)): State<(AppState, RateLimitPolicy)>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_identifier(request.headers());
    let key = rate_limit_key(policy.bucket, &client);
    let now = Utc::now();

    let decision = match state
        .rate_limiter
        .allow_at(&key, policy.max_requests, policy.window, now)
        .await
    {
        Ok(decision) => decision,
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "Rate limit store failed; allowing request");
            return next.run(request).await;
        }
    };

    if !decision.allowed {
        let retry_after = decision.retry_after_secs(now);
        tracing::warn!(
            bucket = policy.bucket,
            client = %client,
            retry_after,
            "Rate limit exceeded"
        );
        return too_many_requests(&decision, retry_after);
    }

    let mut response = next.run(request).await;
    insert_limit_headers(response.headers_mut(), &decision);
    response
}

fn insert_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
}

fn too_many_requests(decision: &RateLimitDecision, retry_after: u64) -> Response {
    let body = serde_json::json!({
        "error": "Too many requests. Please try again later.",
        "code": "RATE_LIMIT_EXCEEDED",
        "details": { "retry_after": retry_after },
    });

    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    insert_limit_headers(headers, decision);
    headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
    headers.insert(
        X_RATELIMIT_RESET,
        HeaderValue::from(decision.reset_at.timestamp().max(0)),
    );
    response
}
