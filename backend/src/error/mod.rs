use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::utils::jwt::TokenError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    /// Server misconfiguration, e.g. no signing secret. The message is logged, never returned.
    Configuration(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND", None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN", None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT", None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST", None),
            AppError::Configuration(msg) => {
                tracing::error!(reason = %msg, "Server configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                    "CONFIGURATION_ERROR",
                    None,
                )
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR",
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR",
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code: code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::Conflict("Resource already exists".to_string())
            }
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                AppError::BadRequest("Referenced resource does not exist".to_string())
            }
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => AppError::Configuration(err.to_string()),
            TokenError::Invalid => AppError::Unauthorized("Authentication required".to_string()),
            TokenError::Signing(_) => AppError::InternalServerError(anyhow::Error::new(err)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn app_error_into_response_maps_status_and_body() {
        let cases = [
            (AppError::BadRequest("bad".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (AppError::Unauthorized("nope".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (AppError::Forbidden("denied".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (AppError::Conflict("taken".into()), StatusCode::CONFLICT, "CONFLICT"),
            (AppError::NotFound("missing".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
        ];

        for (error, status, code) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), status);
            let json = response_json(response).await;
            assert_eq!(json["code"], code);
            assert!(json["details"].is_null());
        }
    }

    #[tokio::test]
    async fn configuration_error_hides_reason() {
        let response = AppError::Configuration("JWT_SECRET is not set".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Server configuration error");
        assert_eq!(json["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn internal_error_maps_to_generic_message() {
        let response = AppError::InternalServerError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn token_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(TokenError::MissingSecret),
            AppError::Configuration(_)
        ));
        assert!(matches!(
            AppError::from(TokenError::Invalid),
            AppError::Unauthorized(_)
        ));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[tokio::test]
    async fn validation_errors_include_field_messages() {
        let errors = Sample {
            name: String::new(),
        }
        .validate()
        .expect_err("invalid");
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0], "name: must not be empty");
    }
}
