pub mod about;
pub mod admin;
pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod stats;

pub use admin::{AdminStore, PgAdminStore};
