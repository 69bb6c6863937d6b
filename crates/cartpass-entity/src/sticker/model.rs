//! Sticker entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cartpass_core::types::money::Kobo;

use super::status::{StickerStatus, derive_status};

/// A physical permit sticker, the core unit of sale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sticker {
    /// Unique sticker identifier.
    pub id: Uuid,
    /// Unique printed code, `{LGA_CODE}-{numeric suffix}`. Immutable.
    pub code: String,
    /// Scannable payload. Currently identical to the code — scanning
    /// clients resolve the code via a lookup call, not an embedded URL.
    pub qr_payload: String,
    /// The LGA that owns this sticker.
    pub lga_id: Uuid,
    /// The generation batch this sticker belongs to.
    pub batch_id: Uuid,
    /// Unit price per month at batch-generation time, in kobo.
    pub unit_price_kobo: Kobo,
    /// Stored lifecycle status. See [`Sticker::effective_status`] for the
    /// derived value every read path must use.
    pub status: StickerStatus,
    /// The officer who activated this sticker.
    pub activated_by: Option<Uuid>,
    /// When the sticker was activated.
    pub activated_at: Option<DateTime<Utc>>,
    /// When the activation period ends. Set once at activation.
    pub expires_at: Option<DateTime<Utc>>,
    /// The beneficiary this sticker is assigned to.
    pub beneficiary_id: Option<Uuid>,
    /// When the sticker row was created.
    pub created_at: DateTime<Utc>,
    /// When the sticker row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Sticker {
    /// The logical status at `now`, deriving expiry lazily.
    pub fn effective_status(&self, now: DateTime<Utc>) -> StickerStatus {
        derive_status(self.status, self.expires_at, now)
    }

    /// Whole days until expiry, when the sticker is currently active.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.effective_status(now) {
            StickerStatus::Active => self.expires_at.map(|e| (e - now).num_days()),
            _ => None,
        }
    }

    /// Whole days since expiry, when the sticker has lapsed.
    pub fn days_overdue(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.effective_status(now) {
            StickerStatus::Expired => self.expires_at.map(|e| (now - e).num_days()),
            _ => None,
        }
    }
}

/// A sticker row to be bulk-inserted at batch-generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSticker {
    /// Generated unique code.
    pub code: String,
    /// Scannable payload derived from the code.
    pub qr_payload: String,
    /// Owning LGA.
    pub lga_id: Uuid,
    /// Owning batch.
    pub batch_id: Uuid,
    /// Unit price per month, in kobo.
    pub unit_price_kobo: Kobo,
}

/// The fields written by the atomic unused→active transition.
#[derive(Debug, Clone)]
pub struct ActivateSticker {
    /// The acting officer.
    pub activated_by: Uuid,
    /// Activation timestamp.
    pub activated_at: DateTime<Utc>,
    /// Expiry timestamp (activation time + duration).
    pub expires_at: DateTime<Utc>,
    /// The beneficiary the sticker is assigned to.
    pub beneficiary_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sticker_activated_at(activated_at: DateTime<Utc>, months: i64) -> Sticker {
        let expires_at = activated_at + Duration::days(30 * months);
        Sticker {
            id: Uuid::new_v4(),
            code: "IFO-175400000000042001".to_string(),
            qr_payload: "IFO-175400000000042001".to_string(),
            lga_id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            unit_price_kobo: Kobo(340_000),
            status: StickerStatus::Active,
            activated_by: Some(Uuid::new_v4()),
            activated_at: Some(activated_at),
            expires_at: Some(expires_at),
            beneficiary_id: Some(Uuid::new_v4()),
            created_at: activated_at,
            updated_at: activated_at,
        }
    }

    #[test]
    fn lazy_expiry_without_writes() {
        let t = Utc::now();
        let sticker = sticker_activated_at(t, 1);

        assert_eq!(
            sticker.effective_status(t + Duration::days(29)),
            StickerStatus::Active
        );
        assert_eq!(
            sticker.effective_status(t + Duration::days(31)),
            StickerStatus::Expired
        );
        // The stored column never changed between those reads.
        assert_eq!(sticker.status, StickerStatus::Active);
    }

    #[test]
    fn days_remaining_and_overdue() {
        let t = Utc::now();
        let sticker = sticker_activated_at(t, 1);

        assert_eq!(sticker.days_remaining(t + Duration::days(10)), Some(20));
        assert_eq!(sticker.days_overdue(t + Duration::days(10)), None);
        assert_eq!(sticker.days_overdue(t + Duration::days(33)), Some(3));
        assert_eq!(sticker.days_remaining(t + Duration::days(33)), None);
    }
}
