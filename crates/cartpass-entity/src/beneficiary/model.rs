//! Beneficiary entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The end customer a sticker is assigned to.
///
/// The phone number, when present, is the natural dedup key within an LGA:
/// activating against a known phone reuses the existing record and updates
/// its name. Anonymous (no-phone) beneficiaries always get a fresh record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Beneficiary {
    /// Unique beneficiary identifier.
    pub id: Uuid,
    /// The LGA this beneficiary operates in.
    pub lga_id: Uuid,
    /// Full name as given at activation time.
    pub full_name: String,
    /// Normalized phone number (`+234XXXXXXXXXX`), when supplied.
    pub phone: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for resolving or creating a beneficiary during activation.
#[derive(Debug, Clone)]
pub struct NewBeneficiary {
    /// Owning LGA.
    pub lga_id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Normalized phone number, when supplied.
    pub phone: Option<String>,
}
