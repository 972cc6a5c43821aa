//! Blog post models and the payloads used to list, create and edit posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{PageQuery, Pagination};
use crate::validation::rules::{normalize_search, validate_slug};

/// A post joined with its category's name and slug.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub slug: String,
    pub github_commit_url: Option<String>,
    pub is_public: bool,
    pub author_id: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    #[default]
    Newest,
    Likes,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    /// Category name; `All` or empty means no filter.
    pub category: Option<String>,
    /// Case-insensitive match on title, content and category name (max 100 characters).
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `likes` sorts by like count; anything else sorts newest first.
    pub sort_by: Option<String>,
    /// Honored only for the authenticated admin.
    pub include_private: Option<String>,
}

impl PostListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    pub fn search(&self) -> Option<String> {
        normalize_search(self.search.as_deref())
    }

    pub fn sort(&self) -> PostSort {
        match self.sort_by.as_deref() {
            Some("likes") => PostSort::Likes,
            _ => PostSort::Newest,
        }
    }

    pub fn wants_private(&self) -> bool {
        matches!(self.include_private.as_deref(), Some("true") | Some("1"))
    }
}

/// Resolved listing filter handed to the repository.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub include_private: bool,
    pub author_id: Option<String>,
    pub sort: PostSort,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePostPayload {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100000, message = "content must be 1-100000 characters"))]
    pub content: String,
    #[validate(range(min = 1, message = "category_id must be positive"))]
    pub category_id: i64,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    #[validate(url)]
    pub github_commit_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePostPayload {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100000, message = "content must be 1-100000 characters"))]
    pub content: String,
    #[validate(range(min = 1, message = "category_id must be positive"))]
    pub category_id: i64,
    #[serde(default = "default_public")]
    pub is_public: bool,
    /// New slug; the current one is kept when omitted.
    #[serde(default)]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub github_commit_url: Option<String>,
}

/// Blank commit URLs from form clients mean "no URL".
fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreatePostPayload {
    pub fn normalized(self) -> Self {
        Self {
            github_commit_url: blank_to_none(self.github_commit_url),
            ..self
        }
    }
}

impl UpdatePostPayload {
    pub fn normalized(self) -> Self {
        Self {
            github_commit_url: blank_to_none(self.github_commit_url),
            ..self
        }
    }
}

/// Column values written by insert and update.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category_id: i64,
    pub slug: String,
    pub is_public: bool,
    pub github_commit_url: Option<String>,
}
