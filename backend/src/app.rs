use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::RateLimitPolicy,
    docs::ApiDoc,
    handlers,
    middleware::{log_error_responses, rate_limit, request_id, require_admin},
    state::AppState,
};

/// Attaches a fixed-window limit to every route already in `router`.
fn limited(router: Router<AppState>, state: &AppState, policy: RateLimitPolicy) -> Router<AppState> {
    router.route_layer(axum_middleware::from_fn_with_state(
        (state.clone(), policy),
        rate_limit,
    ))
}

pub fn build_router(state: AppState) -> Router {
    let policies = state.config.rate_limits;

    // Build public routes (no auth, no limit)
    let public_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/check", get(handlers::auth::check))
        .route("/api/posts", get(handlers::posts::list_posts))
        .route("/api/posts/{slug}", get(handlers::posts::get_post))
        .route("/api/categories", get(handlers::categories::list_categories))
        .route("/api/categories/{slug}", get(handlers::categories::get_category))
        .route("/api/profile", get(handlers::profile::get_profile))
        .route("/api/about", get(handlers::about::get_about));

    // Build rate-limited public routes, one bucket each
    let limited_routes = Router::new()
        .merge(limited(
            Router::new().route("/api/auth/login", post(handlers::auth::login)),
            &state,
            policies.login,
        ))
        .merge(limited(
            Router::new().route("/api/comments/{slug}", get(handlers::comments::list_comments)),
            &state,
            policies.comment_read,
        ))
        .merge(limited(
            Router::new().route("/api/comments/{slug}", post(handlers::comments::create_comment)),
            &state,
            policies.comment_create,
        ))
        .merge(limited(
            Router::new().route("/api/posts/{slug}/likes", get(handlers::likes::like_status)),
            &state,
            policies.like_read,
        ))
        .merge(limited(
            Router::new().route("/api/posts/{slug}/likes", post(handlers::likes::toggle_like)),
            &state,
            policies.like_toggle,
        ))
        .merge(limited(
            Router::new().route("/api/stats", get(handlers::stats::get_stats)),
            &state,
            policies.stats_read,
        ));

    // Build admin-protected routes
    let admin_routes = Router::new()
        .route(
            "/api/posts/{slug}",
            put(handlers::posts::update_post).delete(handlers::posts::delete_post),
        )
        .route(
            "/api/comments/{slug}",
            delete(handlers::comments::delete_comments),
        )
        .route("/api/admin/posts", get(handlers::admin::posts::list_posts))
        .route(
            "/api/admin/comments",
            get(handlers::admin::comments::list_comments),
        )
        .route(
            "/api/admin/comments/{id}",
            delete(handlers::admin::comments::delete_comment),
        )
        .route(
            "/api/admin/categories",
            post(handlers::admin::categories::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            put(handlers::admin::categories::rename_category)
                .delete(handlers::admin::categories::delete_category),
        )
        .route(
            "/api/admin/profile",
            put(handlers::admin::profile::update_profile),
        )
        .route("/api/admin/about", put(handlers::admin::about::update_about))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    // The limit wraps the gate, so throttled callers never reach token checks.
    let admin_create_routes = limited(
        Router::new()
            .route("/api/admin/posts", post(handlers::admin::posts::create_post))
            .route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                require_admin,
            )),
        &state,
        policies.admin_post_create,
    );

    let cors = cors_layer(&state.config.cors_allow_origins);

    Router::new()
        .merge(public_routes)
        .merge(limited_routes)
        .merge(admin_routes)
        .merge(admin_create_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(log_error_responses))
                .layer(cors),
        )
        .with_state(state)
}

/// `*` allows any origin without credentials; explicit origins may send the auth cookie.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(std::time::Duration::from_secs(24 * 60 * 60));

    if origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(origins)
        .allow_credentials(true)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
}
