//! Core business logic for litblogs.

pub mod sanitize;
pub mod services;

pub use services::*;
