//! # cartpass-api
//!
//! HTTP API layer for CartPass built on Axum: application state, route
//! definitions, request/response DTOs, extractors for the gateway-injected
//! actor identity, and the `AppError` → HTTP response mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
