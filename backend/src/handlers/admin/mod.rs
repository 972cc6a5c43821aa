//! Owner-only handlers. Every route here sits behind `require_admin`, so the
//! authenticated [`AdminIdentity`](crate::models::admin::AdminIdentity) is
//! always present as a request extension.

pub mod about;
pub mod categories;
pub mod comments;
pub mod posts;
pub mod profile;
