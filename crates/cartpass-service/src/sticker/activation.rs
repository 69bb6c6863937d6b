//! The officer-initiated activation workflow.
//!
//! One activation is one unit of work: resolve-or-create the beneficiary,
//! flip the sticker unused→active through the store's conditional update,
//! write the receipt-numbered activation record, and bump the batch
//! counter — all inside a single transaction that rolls back entirely on
//! any failure. The verification log entry is written after the
//! transaction resolves and is best-effort.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use cartpass_core::config::permits::PermitConfig;
use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::traits::PricingProvider;
use cartpass_core::types::money::Kobo;
use cartpass_core::types::phone::normalize_phone;
use cartpass_database::repositories::activation::ActivationRepository;
use cartpass_database::repositories::batch::BatchRepository;
use cartpass_database::repositories::beneficiary::BeneficiaryRepository;
use cartpass_database::repositories::sticker::StickerRepository;
use cartpass_database::repositories::verification::VerificationLogRepository;
use cartpass_entity::activation::{ActivationRecord, NewActivation};
use cartpass_entity::beneficiary::{Beneficiary, NewBeneficiary};
use cartpass_entity::geo::GeoPoint;
use cartpass_entity::sticker::{ActivateSticker, Sticker};
use cartpass_entity::verification::{NewVerification, VerificationChannel, VerificationResult};

use crate::context::{ClientMeta, RequestContext};

/// Input to one activation attempt.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
    /// The scanned sticker code.
    pub sticker_code: String,
    /// Beneficiary full name.
    pub beneficiary_name: String,
    /// Beneficiary phone, optional. Validated and normalized when present.
    pub beneficiary_phone: Option<String>,
    /// Paid duration in months.
    pub duration_months: u32,
    /// Amount collected, in kobo.
    pub amount_paid: Kobo,
    /// Payment method; defaults to `"cash"`.
    pub payment_method: Option<String>,
    /// Back-dated activation timestamp, when the office records a sale
    /// made earlier in the field.
    pub activated_at_override: Option<DateTime<Utc>>,
    /// Capture location.
    pub geo: Option<GeoPoint>,
}

/// Summary returned to the officer's device on success.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivationSummary {
    /// The activation record ID.
    pub activation_id: Uuid,
    /// Receipt number for the printed/SMS receipt.
    pub receipt_number: String,
    /// The activated sticker code.
    pub sticker_code: String,
    /// Activation timestamp.
    pub activated_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Paid duration in months.
    pub duration_months: u32,
    /// Amount collected, in kobo.
    pub amount_paid: Kobo,
    /// The resolved beneficiary.
    pub beneficiary: Beneficiary,
}

/// Orchestrates one activation end-to-end.
pub struct ActivationService {
    pool: PgPool,
    sticker_repo: Arc<StickerRepository>,
    batch_repo: Arc<BatchRepository>,
    beneficiary_repo: Arc<BeneficiaryRepository>,
    activation_repo: Arc<ActivationRepository>,
    verification_repo: Arc<VerificationLogRepository>,
    pricing: Arc<dyn PricingProvider>,
    config: PermitConfig,
}

impl ActivationService {
    /// Creates a new activation service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        sticker_repo: Arc<StickerRepository>,
        batch_repo: Arc<BatchRepository>,
        beneficiary_repo: Arc<BeneficiaryRepository>,
        activation_repo: Arc<ActivationRepository>,
        verification_repo: Arc<VerificationLogRepository>,
        pricing: Arc<dyn PricingProvider>,
        config: PermitConfig,
    ) -> Self {
        Self {
            pool,
            sticker_repo,
            batch_repo,
            beneficiary_repo,
            activation_repo,
            verification_repo,
            pricing,
            config,
        }
    }

    /// Activate a sticker for a beneficiary.
    ///
    /// Not idempotent: a second call for the same code fails with
    /// `ALREADY_ACTIVATED`. A sticker is a physical one-time-use permit.
    pub async fn activate(
        &self,
        ctx: &RequestContext,
        client: &ClientMeta,
        req: ActivationRequest,
    ) -> AppResult<ActivationSummary> {
        let result = self.try_activate(ctx, &req).await;

        // Audit every attempt, success or failure. Logging is best-effort
        // relative to the primary outcome.
        let (log_result, note) = match &result {
            Ok(summary) => (
                VerificationResult::Success,
                Some(format!("activated, receipt {}", summary.receipt_number)),
            ),
            Err(e) if e.kind == ErrorKind::NotFound => {
                (VerificationResult::Invalid, Some(e.message.clone()))
            }
            Err(e) => (VerificationResult::Failed, Some(e.message.clone())),
        };
        let sticker_id = self
            .sticker_repo
            .find_by_code(req.sticker_code.trim())
            .await
            .ok()
            .flatten()
            .map(|s| s.id);

        let entry = NewVerification {
            sticker_id,
            sticker_code: req.sticker_code.trim().to_string(),
            verified_by: Some(ctx.actor_id),
            channel: VerificationChannel::Manual,
            result: log_result,
            ip_address: client.ip_address.clone(),
            device_info: client.device_info.clone(),
            latitude: req.geo.map(|g| g.latitude),
            longitude: req.geo.map(|g| g.longitude),
            note,
        };
        if let Err(log_err) = self.verification_repo.record(&entry).await {
            warn!(
                sticker_code = %entry.sticker_code,
                error = %log_err,
                "Failed to write verification log entry for activation attempt"
            );
        }

        result
    }

    /// The validated, transactional part of the workflow.
    async fn try_activate(
        &self,
        ctx: &RequestContext,
        req: &ActivationRequest,
    ) -> AppResult<ActivationSummary> {
        let code = req.sticker_code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Sticker code is required"));
        }

        let name = req.beneficiary_name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Beneficiary name is required"));
        }

        // Phone is optional; when supplied it must be a valid Nigerian
        // mobile number and is stored in normalized form.
        let phone = match req.beneficiary_phone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_phone(raw).ok_or_else(|| {
                AppError::validation(format!("Invalid beneficiary phone number: '{raw}'"))
            })?),
        };

        if req.duration_months < self.config.min_duration_months
            || req.duration_months > self.config.max_duration_months
        {
            return Err(AppError::validation(format!(
                "Duration must be between {} and {} months",
                self.config.min_duration_months, self.config.max_duration_months
            )));
        }

        let sticker = self
            .sticker_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sticker '{code}' not found")))?;

        // The LGA's current configured price wins over the price cached on
        // the sticker at batch-generation time.
        let unit_price = self
            .pricing
            .current_unit_price(sticker.lga_id)
            .await?
            .unwrap_or(sticker.unit_price_kobo);

        let expected = unit_price.times(i64::from(req.duration_months));
        if !expected.within_tolerance(req.amount_paid, self.config.amount_tolerance_kobo) {
            return Err(AppError::amount_mismatch(
                expected.value(),
                req.amount_paid.value(),
            ));
        }

        let activated_at = req.activated_at_override.unwrap_or_else(Utc::now);
        let expires_at = activated_at
            .checked_add_months(Months::new(req.duration_months))
            .ok_or_else(|| AppError::validation("Activation date out of range"))?;

        let payment_method = req
            .payment_method
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "cash".to_string());

        let (sticker, record, beneficiary) = self
            .run_transaction(
                ctx,
                &sticker,
                code,
                phone,
                name,
                activated_at,
                expires_at,
                req,
                payment_method,
            )
            .await?;

        info!(
            actor_id = %ctx.actor_id,
            sticker_code = %sticker.code,
            receipt_number = %record.receipt_number,
            amount_paid = %record.amount_paid_kobo,
            "Sticker activated"
        );

        Ok(ActivationSummary {
            activation_id: record.id,
            receipt_number: record.receipt_number,
            sticker_code: sticker.code,
            activated_at,
            expires_at,
            duration_months: req.duration_months,
            amount_paid: req.amount_paid,
            beneficiary,
        })
    }

    /// Everything inside the atomicity boundary. Any failure rolls the
    /// whole unit back: no partial beneficiary, no partial counter
    /// increment, and the sticker stays `unused`.
    #[allow(clippy::too_many_arguments)]
    async fn run_transaction(
        &self,
        ctx: &RequestContext,
        sticker: &Sticker,
        code: &str,
        phone: Option<String>,
        name: &str,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        req: &ActivationRequest,
        payment_method: String,
    ) -> AppResult<(Sticker, ActivationRecord, Beneficiary)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let beneficiary = self
            .beneficiary_repo
            .resolve(
                &mut tx,
                &NewBeneficiary {
                    lga_id: sticker.lga_id,
                    full_name: name.to_string(),
                    phone,
                },
            )
            .await?;

        let activated = self
            .sticker_repo
            .activate(
                &mut tx,
                code,
                &ActivateSticker {
                    activated_by: ctx.actor_id,
                    activated_at,
                    expires_at,
                    beneficiary_id: beneficiary.id,
                },
            )
            .await?;

        let record = self
            .activation_repo
            .create(
                &mut tx,
                &NewActivation {
                    sticker_id: activated.id,
                    beneficiary_id: beneficiary.id,
                    lga_id: activated.lga_id,
                    activated_by: ctx.actor_id,
                    activated_at,
                    expires_at,
                    duration_months: req.duration_months as i32,
                    amount_paid_kobo: req.amount_paid,
                    payment_method,
                    latitude: req.geo.map(|g| g.latitude),
                    longitude: req.geo.map(|g| g.longitude),
                },
            )
            .await?;

        self.batch_repo
            .increment_used(&mut tx, activated.batch_id, 1)
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit activation", e)
        })?;

        Ok((activated, record, beneficiary))
    }
}
