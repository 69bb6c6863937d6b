//! Batch generation and lifecycle workflows.

pub mod service;

pub use service::{BatchService, GenerateBatchRequest, GeneratedBatch};
