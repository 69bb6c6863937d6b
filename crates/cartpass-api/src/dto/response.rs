//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cartpass_core::types::money::Kobo;
use cartpass_entity::beneficiary::Beneficiary;
use cartpass_service::sticker::ActivationSummary;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Receipt reference nested in the activation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptResponse {
    /// Receipt number, `RCP-YYYYMMDD-NNN`.
    pub receipt_number: String,
}

/// Successful activation payload.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationResponse {
    /// Activation record ID.
    pub activation_id: Uuid,
    /// The activated sticker code.
    pub sticker_code: String,
    /// Activation timestamp.
    pub activated_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expiry_date: DateTime<Utc>,
    /// Paid duration in months.
    pub duration_months: u32,
    /// Amount collected, in kobo.
    pub amount_paid_kobo: Kobo,
    /// The resolved beneficiary.
    pub beneficiary: Beneficiary,
    /// Receipt reference.
    pub receipt: ReceiptResponse,
}

impl From<ActivationSummary> for ActivationResponse {
    fn from(summary: ActivationSummary) -> Self {
        Self {
            activation_id: summary.activation_id,
            sticker_code: summary.sticker_code,
            activated_at: summary.activated_at,
            expiry_date: summary.expires_at,
            duration_months: summary.duration_months,
            amount_paid_kobo: summary.amount_paid,
            beneficiary: summary.beneficiary,
            receipt: ReceiptResponse {
                receipt_number: summary.receipt_number,
            },
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    pub status: String,
    /// Whether the database answered the ping.
    pub database: bool,
    /// Server version.
    pub version: String,
}
