//! LGA entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cartpass_core::types::money::Kobo;

/// A Local Government Area — the tenant unit owning stickers, batches,
/// personnel, and pricing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lga {
    /// Unique LGA identifier.
    pub id: Uuid,
    /// Display name, e.g. `"Ifo"`.
    pub name: String,
    /// Short uppercase code used as the sticker code prefix, e.g. `"IFO"`.
    pub code: String,
    /// The state this LGA belongs to.
    pub state_name: Option<String>,
    /// Currently configured sticker unit price per month, in kobo.
    /// Zero means no price has been configured yet.
    pub sticker_price_kobo: Kobo,
    /// When the LGA was registered.
    pub created_at: DateTime<Utc>,
    /// When the LGA was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Lga {
    /// The configured unit price, or `None` when no price is set.
    pub fn configured_price(&self) -> Option<Kobo> {
        (self.sticker_price_kobo.value() > 0).then_some(self.sticker_price_kobo)
    }
}
