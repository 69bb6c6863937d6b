//! # cartpass-entity
//!
//! Domain entity models for CartPass. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod activation;
pub mod batch;
pub mod beneficiary;
pub mod geo;
pub mod lga;
pub mod sticker;
pub mod verification;
