//! Verification log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::result::{VerificationChannel, VerificationResult};

/// An immutable log entry recording one verification or activation attempt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationLogEntry {
    /// Auto-incrementing entry identifier.
    pub id: i64,
    /// The sticker that was checked, when the code resolved.
    pub sticker_id: Option<Uuid>,
    /// The code as presented by the client.
    pub sticker_code: String,
    /// The verifying actor. `None` for anonymous public checks.
    pub verified_by: Option<Uuid>,
    /// The channel the attempt arrived through.
    pub channel: VerificationChannel,
    /// Classified outcome.
    pub result: VerificationResult,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client device description.
    pub device_info: Option<String>,
    /// Capture latitude.
    pub latitude: Option<f64>,
    /// Capture longitude.
    pub longitude: Option<f64>,
    /// Free-text note.
    pub note: Option<String>,
    /// When the attempt happened.
    pub created_at: DateTime<Utc>,
}

/// Data for one verification log entry.
#[derive(Debug, Clone)]
pub struct NewVerification {
    /// The sticker that was checked, when the code resolved.
    pub sticker_id: Option<Uuid>,
    /// The code as presented.
    pub sticker_code: String,
    /// The verifying actor, when authenticated.
    pub verified_by: Option<Uuid>,
    /// Attempt channel.
    pub channel: VerificationChannel,
    /// Classified outcome.
    pub result: VerificationResult,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client device description.
    pub device_info: Option<String>,
    /// Capture latitude.
    pub latitude: Option<f64>,
    /// Capture longitude.
    pub longitude: Option<f64>,
    /// Free-text note.
    pub note: Option<String>,
}
