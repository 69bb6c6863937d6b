//! Sticker workflows: activation and verification.

pub mod activation;
pub mod verification;

pub use activation::{ActivationRequest, ActivationService, ActivationSummary};
pub use verification::{VerificationOutcome, VerificationService};
