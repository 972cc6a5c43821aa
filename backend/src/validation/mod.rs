//! Input rules shared by payload validators (`#[validate(custom(...))]`) and
//! handler-level checks on path and query values.

pub mod rules;
