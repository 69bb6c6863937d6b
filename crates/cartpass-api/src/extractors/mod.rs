//! Custom Axum extractors.

pub mod actor;
pub mod client_meta;
pub mod pagination;

pub use actor::Actor;
pub use client_meta::ClientInfo;
pub use pagination::PaginationParams;
