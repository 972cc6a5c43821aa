//! Models for the blog owner's account: identity, credentials and public profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::rules::validate_optional_email;

/// The authenticated principal resolved by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminIdentity {
    pub id: String,
    /// Display name as currently stored, not as embedded in the token.
    pub name: String,
}

/// Login lookup row. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct AdminCredentials {
    pub id: String,
    pub name: String,
    pub password_hash: String,
}

impl AdminCredentials {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AdminProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub github_username: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub profile: AdminProfile,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 100, message = "name is required (max 100 characters)"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub github_username: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

impl UpdateProfilePayload {
    /// Trims every field; empty optional fields are stored as NULL.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            name: self.name.trim().to_string(),
            email: clean(self.email),
            avatar_url: clean(self.avatar_url),
            github_username: clean(self.github_username),
            bio: clean(self.bio),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "password must be 1-100 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: AdminIdentity,
}

/// Body of `GET /api/auth/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<AdminIdentity>,
}

impl AuthStatus {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    pub fn authenticated(user: AdminIdentity) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_status_serializes_null_user() {
        let json = serde_json::to_value(AuthStatus::anonymous()).unwrap();
        assert_eq!(json, serde_json::json!({ "authenticated": false, "user": null }));
    }

    #[test]
    fn login_payload_enforces_lengths() {
        let ok = LoginPayload {
            username: "admin".into(),
            password: "pw".into(),
        };
        assert!(ok.validate().is_ok());

        let long_user = LoginPayload {
            username: "a".repeat(51),
            password: "pw".into(),
        };
        assert!(long_user.validate().is_err());

        let empty_password = LoginPayload {
            username: "admin".into(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn profile_payload_normalizes_blank_fields() {
        let payload = UpdateProfilePayload {
            name: "  Kim  ".into(),
            email: Some("  ".into()),
            avatar_url: None,
            github_username: Some(" octo ".into()),
            bio: Some(String::new()),
        }
        .normalized();
        assert_eq!(payload.name, "Kim");
        assert!(payload.email.is_none());
        assert_eq!(payload.github_username.as_deref(), Some("octo"));
        assert!(payload.bio.is_none());
    }

    #[test]
    fn profile_payload_rejects_bad_email() {
        let payload = UpdateProfilePayload {
            name: "Kim".into(),
            email: Some("not-an-email".into()),
            avatar_url: None,
            github_username: None,
            bio: None,
        };
        assert!(payload.validate().is_err());
    }
}
