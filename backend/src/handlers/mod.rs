pub mod about;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod likes;
pub mod posts;
pub mod profile;
pub mod stats;

use crate::{error::AppError, validation::rules::is_valid_slug};

/// Rejects malformed path slugs before they reach the database.
pub(crate) fn ensure_valid_slug(slug: &str) -> Result<(), AppError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid slug".to_string()))
    }
}
