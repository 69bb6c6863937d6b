//! Activation record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cartpass_core::types::money::Kobo;

/// One successful activation. Created exactly once per activation call,
/// never updated or deleted. The sticker's own `status`/`expires_at`
/// remain authoritative for current state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivationRecord {
    /// Unique activation identifier.
    pub id: Uuid,
    /// Date-scoped receipt number, `RCP-YYYYMMDD-NNN`.
    pub receipt_number: String,
    /// The activated sticker.
    pub sticker_id: Uuid,
    /// The beneficiary the sticker was assigned to.
    pub beneficiary_id: Uuid,
    /// The LGA the activation happened under.
    pub lga_id: Uuid,
    /// The acting officer or supervisor.
    pub activated_by: Uuid,
    /// Activation timestamp.
    pub activated_at: DateTime<Utc>,
    /// Expiry timestamp (activation + duration).
    pub expires_at: DateTime<Utc>,
    /// Paid duration in months.
    pub duration_months: i32,
    /// Amount collected, in kobo.
    pub amount_paid_kobo: Kobo,
    /// Payment method, e.g. `"cash"`, `"transfer"`, `"pos"`.
    pub payment_method: String,
    /// Capture latitude, when the device supplied one.
    pub latitude: Option<f64>,
    /// Capture longitude, when the device supplied one.
    pub longitude: Option<f64>,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// Data for the activation record written inside the activation transaction.
#[derive(Debug, Clone)]
pub struct NewActivation {
    /// The activated sticker.
    pub sticker_id: Uuid,
    /// The resolved beneficiary.
    pub beneficiary_id: Uuid,
    /// Owning LGA.
    pub lga_id: Uuid,
    /// Acting officer.
    pub activated_by: Uuid,
    /// Activation timestamp.
    pub activated_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Paid duration in months.
    pub duration_months: i32,
    /// Amount collected, in kobo.
    pub amount_paid_kobo: Kobo,
    /// Payment method.
    pub payment_method: String,
    /// Capture latitude.
    pub latitude: Option<f64>,
    /// Capture longitude.
    pub longitude: Option<f64>,
}
