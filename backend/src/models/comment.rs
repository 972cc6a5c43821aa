use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::validation::rules::{strip_tags, validate_device_id};

/// Public view of a comment. The commenter's device id is kept private.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_name: String,
    pub content: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Moderation view with the owning post.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AdminComment {
    pub id: i64,
    pub post_id: i64,
    pub author_name: String,
    pub content: String,
    pub device_id: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub post_title: String,
    pub post_slug: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminCommentListResponse {
    pub comments: Vec<AdminComment>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentCreatedResponse {
    pub message: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 100, message = "authorName must be 1-100 characters"))]
    pub author_name: String,
    #[validate(length(min = 1, max = 5000, message = "content must be 1-5000 characters"))]
    pub content: String,
    #[validate(custom(function = "validate_device_id"))]
    pub device_id: String,
}

impl CreateCommentPayload {
    /// Trims input and strips markup from the author name.
    pub fn sanitized(self) -> Self {
        Self {
            author_name: strip_tags(self.author_name.trim()).trim().to_string(),
            content: self.content.trim().to_string(),
            device_id: self.device_id.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentQuery {
    /// Deletes only this comment; all of the post's comments when omitted.
    pub comment_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_then_validate() {
        let payload = CreateCommentPayload {
            author_name: "  <b>Lee</b> ".into(),
            content: " Nice post ".into(),
            device_id: "dev-1".into(),
        }
        .sanitized();
        assert_eq!(payload.author_name, "Lee");
        assert_eq!(payload.content, "Nice post");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn name_made_only_of_tags_is_rejected() {
        let payload = CreateCommentPayload {
            author_name: "<i></i>".into(),
            content: "hi".into(),
            device_id: "dev-1".into(),
        }
        .sanitized();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn bad_device_id_is_rejected() {
        let payload = CreateCommentPayload {
            author_name: "Lee".into(),
            content: "hi".into(),
            device_id: "dev 1!".into(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn payload_uses_camel_case_fields() {
        let payload: CreateCommentPayload = serde_json::from_value(serde_json::json!({
            "authorName": "Lee",
            "content": "hi",
            "deviceId": "abc"
        }))
        .unwrap();
        assert_eq!(payload.author_name, "Lee");
        assert_eq!(payload.device_id, "abc");
    }
}
