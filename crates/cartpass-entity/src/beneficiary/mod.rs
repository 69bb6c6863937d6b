//! Beneficiary ("cart pusher") entity.

pub mod model;

pub use model::{Beneficiary, NewBeneficiary};
