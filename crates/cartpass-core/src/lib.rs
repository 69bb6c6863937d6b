//! # cartpass-core
//!
//! Core crate for CartPass. Contains configuration schemas, shared types
//! (pagination, money, phone numbers), the pricing trait seam, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other CartPass crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
