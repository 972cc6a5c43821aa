pub mod cookies;
pub mod jwt;
pub mod password;
pub mod slug;

pub use jwt::*;
pub use password::*;
