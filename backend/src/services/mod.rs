pub mod auth_gate;
pub mod rate_limit;

pub use auth_gate::{AuthGate, GateDecision};
pub use rate_limit::{InMemoryRateLimitStore, RateLimitStore, RateLimiter};
