use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use blog_backend::app::build_router;
use tower::ServiceExt;

mod support;

use support::{
    admin_cookie, body_json, config_with, state_with, test_state, FailingAdminStore,
    FakeAdminStore, ADMIN_ID, ADMIN_NAME,
};

fn check_request(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/auth/check");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn no_cookie_reports_anonymous() {
    let app = build_router(test_state());
    let response = app.oneshot(check_request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["authenticated"], false);
    assert!(json["user"].is_null());
}

#[tokio::test]
async fn forged_cookie_still_returns_200() {
    let app = build_router(test_state());
    let response = app
        .oneshot(check_request(Some("token=not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["authenticated"], false);
}

#[tokio::test]
async fn valid_cookie_reports_stored_identity() {
    let state = test_state();
    let cookie = admin_cookie(&state);
    let app = build_router(state);

    let response = app
        .oneshot(check_request(Some(&format!("theme=dark; {}", cookie))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["authenticated"], true);
    assert_eq!(json["user"]["id"], ADMIN_ID);
    assert_eq!(json["user"]["name"], ADMIN_NAME);
}

#[tokio::test]
async fn identity_store_failure_is_treated_as_anonymous() {
    let healthy = test_state();
    let cookie = admin_cookie(&healthy);
    let app = build_router(state_with(
        support::test_config(),
        Arc::new(FailingAdminStore),
    ));

    let response = app.oneshot(check_request(Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["authenticated"], false);
}

#[tokio::test]
async fn missing_secret_fails_closed_with_500() {
    let signed_elsewhere = admin_cookie(&test_state());
    let state = state_with(
        config_with(&[("JWT_SECRET", None)]),
        Arc::new(FakeAdminStore::new()),
    );
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(check_request(Some(&signed_elsewhere)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
    assert!(!json.to_string().contains("JWT_SECRET"));

    // Without a cookie there is nothing to verify.
    let anonymous = app.oneshot(check_request(None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::OK);
}
