//! Activation record entity: the receipt written per successful activation.

pub mod model;

pub use model::{ActivationRecord, NewActivation};
