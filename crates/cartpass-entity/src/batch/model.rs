//! Sticker batch entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::BatchStatus;

/// A bulk generation run of stickers sharing a numbering scheme and a
/// monotonic usage counter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StickerBatch {
    /// Unique batch identifier.
    pub id: Uuid,
    /// Unique batch code, `BATCH-{year}-{sequence}`.
    pub code: String,
    /// The LGA that owns this batch.
    pub lga_id: Uuid,
    /// Requested sticker quantity.
    pub quantity: i64,
    /// Numbering prefix shared by the batch's sticker codes (the LGA code).
    pub prefix: String,
    /// First per-batch sequence number.
    pub number_start: i32,
    /// Last per-batch sequence number.
    pub number_end: i32,
    /// Activated sticker count. Monotonic, never decremented.
    pub used_count: i64,
    /// Batch lifecycle status.
    pub status: BatchStatus,
    /// Free-text notes from the requesting admin.
    pub notes: Option<String>,
    /// The admin who requested the batch.
    pub created_by: Uuid,
    /// When the batch was generated.
    pub created_at: DateTime<Utc>,
    /// When the batch was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StickerBatch {
    /// Remaining activation capacity.
    pub fn remaining(&self) -> i64 {
        self.quantity - self.used_count
    }
}

/// Batch metadata to persist at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatch {
    /// Generated batch code.
    pub code: String,
    /// Owning LGA.
    pub lga_id: Uuid,
    /// Requested quantity.
    pub quantity: i64,
    /// Sticker code prefix.
    pub prefix: String,
    /// First sequence number.
    pub number_start: i32,
    /// Last sequence number.
    pub number_end: i32,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Requesting admin.
    pub created_by: Uuid,
}
