//! Read-only sticker verification.
//!
//! Both the officer-facing and public-facing paths classify outcomes with
//! the same [`VerificationResult::classify`] function and never mutate
//! sticker state. Every attempt appends one log entry, best-effort.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use cartpass_core::result::AppResult;
use cartpass_core::types::pagination::{PageRequest, PageResponse};
use cartpass_database::repositories::beneficiary::BeneficiaryRepository;
use cartpass_database::repositories::sticker::StickerRepository;
use cartpass_database::repositories::verification::VerificationLogRepository;
use cartpass_entity::beneficiary::Beneficiary;
use cartpass_entity::geo::GeoPoint;
use cartpass_entity::sticker::StickerStatus;
use cartpass_entity::verification::{
    NewVerification, VerificationChannel, VerificationLogEntry, VerificationResult,
};

use crate::context::ClientMeta;

/// What a verification attempt found.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationOutcome {
    /// Whether the sticker is currently valid (active, not expired).
    pub valid: bool,
    /// Classified result of the check.
    pub result: VerificationResult,
    /// The sticker's logical status, when the code resolved.
    pub status: Option<StickerStatus>,
    /// When the sticker was activated.
    pub activated_at: Option<DateTime<Utc>>,
    /// When the activation period ends.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whole days of validity left, for active stickers.
    pub days_remaining: Option<i64>,
    /// Whole days since expiry, for lapsed stickers.
    pub days_overdue: Option<i64>,
    /// The assigned beneficiary, when the code resolved.
    pub beneficiary: Option<Beneficiary>,
}

/// Verification lookups and the append-only audit trail.
#[derive(Debug, Clone)]
pub struct VerificationService {
    sticker_repo: Arc<StickerRepository>,
    beneficiary_repo: Arc<BeneficiaryRepository>,
    verification_repo: Arc<VerificationLogRepository>,
}

impl VerificationService {
    /// Creates a new verification service.
    pub fn new(
        sticker_repo: Arc<StickerRepository>,
        beneficiary_repo: Arc<BeneficiaryRepository>,
        verification_repo: Arc<VerificationLogRepository>,
    ) -> Self {
        Self {
            sticker_repo,
            beneficiary_repo,
            verification_repo,
        }
    }

    /// Check a sticker's current validity.
    ///
    /// Idempotent with respect to sticker state: only the append-only log
    /// grows. `verified_by` is `None` for anonymous public checks.
    pub async fn verify(
        &self,
        code: &str,
        verified_by: Option<Uuid>,
        channel: VerificationChannel,
        client: &ClientMeta,
        geo: Option<GeoPoint>,
    ) -> AppResult<VerificationOutcome> {
        let now = Utc::now();
        let sticker = self.sticker_repo.find_by_code(code.trim()).await?;

        let status = sticker.as_ref().map(|s| s.effective_status(now));
        let result = VerificationResult::classify(status);

        let beneficiary = match sticker.as_ref().and_then(|s| s.beneficiary_id) {
            Some(id) => self.beneficiary_repo.find_by_id(id).await?,
            None => None,
        };

        let outcome = VerificationOutcome {
            valid: result == VerificationResult::Success,
            result,
            status,
            activated_at: sticker.as_ref().and_then(|s| s.activated_at),
            expires_at: sticker.as_ref().and_then(|s| s.expires_at),
            days_remaining: sticker.as_ref().and_then(|s| s.days_remaining(now)),
            days_overdue: sticker.as_ref().and_then(|s| s.days_overdue(now)),
            beneficiary,
        };

        let entry = NewVerification {
            sticker_id: sticker.as_ref().map(|s| s.id),
            sticker_code: code.trim().to_string(),
            verified_by,
            channel,
            result,
            ip_address: client.ip_address.clone(),
            device_info: client.device_info.clone(),
            latitude: geo.map(|g| g.latitude),
            longitude: geo.map(|g| g.longitude),
            note: None,
        };
        if let Err(log_err) = self.verification_repo.record(&entry).await {
            warn!(
                sticker_code = %entry.sticker_code,
                error = %log_err,
                "Failed to write verification log entry"
            );
        }

        Ok(outcome)
    }

    /// Paginated verification history for a code, for audit and disputes.
    pub async fn history(
        &self,
        code: &str,
        page: PageRequest,
    ) -> AppResult<PageResponse<VerificationLogEntry>> {
        self.verification_repo.history(code.trim(), &page).await
    }
}
