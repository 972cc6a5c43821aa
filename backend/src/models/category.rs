use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::rules::validate_slug;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Category with the number of public posts filed under it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub category: Category,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// Derived from the name when omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}
