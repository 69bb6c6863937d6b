//! Verification log entity: the append-only audit of every check.

pub mod model;
pub mod result;

pub use model::{NewVerification, VerificationLogEntry};
pub use result::{VerificationChannel, VerificationResult};
