use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");
const MAX_REQUEST_ID_LENGTH: usize = 128;

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Caller-supplied ids are reused only when short and made of visible ASCII.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .or_else(|| headers.get(CORRELATION_ID_HEADER))
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LENGTH
                && id.chars().all(|c| c.is_ascii_graphic())
        })
        .map(str::to_string)
}

/// Tags the request with an id, runs the rest of the stack inside a span
/// carrying it, and echoes it in `x-request-id`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!("request", request_id = %id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn prefers_request_id_over_correlation_id() {
        let map = headers(&[("x-request-id", "req-1"), ("x-correlation-id", "corr-1")]);
        assert_eq!(incoming_request_id(&map).as_deref(), Some("req-1"));

        let map = headers(&[("x-correlation-id", "corr-1")]);
        assert_eq!(incoming_request_id(&map).as_deref(), Some("corr-1"));
    }

    #[test]
    fn rejects_unusable_ids() {
        assert!(incoming_request_id(&headers(&[("x-request-id", "has space")])).is_none());
        assert!(incoming_request_id(&headers(&[("x-request-id", "   ")])).is_none());
        let long: &'static str = Box::leak("a".repeat(129).into_boxed_str());
        assert!(incoming_request_id(&headers(&[("x-request-id", long)])).is_none());
    }
}
