//! Data models shared across database access and API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::validation::rules::{clamp_limit, clamp_page};

pub mod about;
pub mod admin;
pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod stats;

/// Page-based pagination parameters.
///
/// Values are kept as raw strings so that malformed input falls back to
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default: 1, max: 1000).
    pub page: Option<String>,
    /// Page size (default: 10, max: 100).
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        clamp_page(self.page.as_deref())
    }

    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit.as_deref())
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total <= 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_and_offset() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 10);
        assert_eq!(query.offset(), 0);

        let query = PageQuery {
            page: Some("3".into()),
            limit: Some("20".into()),
        };
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(2, 5, 12)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["page"], 2);
    }
}
