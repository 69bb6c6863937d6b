//! HTTP error responses.
//!
//! The `AppError` → HTTP mapping itself is implemented next to `AppError`
//! in cartpass-core (behind its `axum` feature); this module re-exports
//! the response body type for handlers and tests.

pub use cartpass_core::error::ApiErrorResponse;
