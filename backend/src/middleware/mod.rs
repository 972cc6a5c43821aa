pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod request_id;

pub use auth::{require_admin, MaybeAdmin};
pub use logging::log_error_responses;
pub use rate_limit::rate_limit;
pub use request_id::{request_id, RequestId};
