//! Common utilities and shared types for litblogs.
//!
//! This crate provides foundational components used across all litblogs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Access Codes**: Short class join codes via [`generate_access_code`]
//!
//! # Example
//!
//! ```no_run
//! use litblogs_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod access_code;
pub mod config;
pub mod error;
pub mod id;

pub use access_code::{ACCESS_CODE_LEN, generate_access_code};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
