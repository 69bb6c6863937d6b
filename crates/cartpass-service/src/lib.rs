//! # cartpass-service
//!
//! Business logic service layer for CartPass. Each service orchestrates
//! repositories to implement application-level use cases: batch
//! generation, sticker activation, and verification.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod batch;
pub mod codegen;
pub mod context;
pub mod sticker;

pub use batch::BatchService;
pub use context::{ActorRole, ClientMeta, RequestContext};
pub use sticker::{ActivationService, VerificationService};
