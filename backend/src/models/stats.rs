use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    /// Public posts only.
    pub total_posts: i64,
    pub total_likes: i64,
    pub total_comments: i64,
}
