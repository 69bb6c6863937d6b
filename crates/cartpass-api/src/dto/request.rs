//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cartpass_entity::geo::GeoPoint;

/// Activate-sticker request body.
///
/// `amount_paid` is in whole Naira as sent by field devices; the handler
/// converts to kobo exactly once before the service sees it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivateStickerRequest {
    /// The scanned sticker code.
    #[validate(length(min = 1, message = "Sticker code is required"))]
    pub sticker_code: String,
    /// Beneficiary full name.
    #[validate(length(min = 1, max = 200, message = "Beneficiary name is required"))]
    pub beneficiary_name: String,
    /// Beneficiary phone (optional).
    pub beneficiary_phone: Option<String>,
    /// Paid duration in months.
    pub duration_months: u32,
    /// Amount collected, in whole Naira.
    pub amount_paid: i64,
    /// Payment method; defaults to `"cash"`.
    pub payment_method: Option<String>,
    /// Back-dated activation timestamp.
    pub activated_at: Option<DateTime<Utc>>,
    /// Capture location.
    pub geo: Option<GeoPoint>,
}

/// Public verify request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyRequest {
    /// The scanned sticker code.
    #[validate(length(min = 1, message = "Sticker code is required"))]
    pub sticker_code: String,
    /// Capture location.
    pub geo: Option<GeoPoint>,
}

/// Revoke-sticker request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeStickerRequest {
    /// Reason recorded in the audit trail.
    pub reason: Option<String>,
}

/// Bulk-generate batch request body (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateBatchRequest {
    /// The LGA to generate for.
    pub lga_id: Uuid,
    /// Number of stickers to generate.
    pub quantity: i64,
    /// Free-text notes.
    pub notes: Option<String>,
}
