//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use cartpass_core::config::AppConfig;
use cartpass_database::repositories::activation::ActivationRepository;
use cartpass_database::repositories::batch::BatchRepository;
use cartpass_database::repositories::beneficiary::BeneficiaryRepository;
use cartpass_database::repositories::lga::LgaRepository;
use cartpass_database::repositories::sticker::StickerRepository;
use cartpass_database::repositories::verification::VerificationLogRepository;
use cartpass_service::batch::BatchService;
use cartpass_service::sticker::{ActivationService, VerificationService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    // ── Repositories ─────────────────────────────────────────
    /// LGA repository (also the pricing provider).
    pub lga_repo: Arc<LgaRepository>,
    /// Sticker repository.
    pub sticker_repo: Arc<StickerRepository>,
    /// Batch repository.
    pub batch_repo: Arc<BatchRepository>,
    /// Beneficiary repository.
    pub beneficiary_repo: Arc<BeneficiaryRepository>,
    /// Activation record repository.
    pub activation_repo: Arc<ActivationRepository>,
    /// Verification log repository.
    pub verification_repo: Arc<VerificationLogRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Batch generation and lifecycle service.
    pub batch_service: Arc<BatchService>,
    /// Activation workflow service.
    pub activation_service: Arc<ActivationService>,
    /// Verification service.
    pub verification_service: Arc<VerificationService>,
}

impl AppState {
    /// Wire repositories and services from a configuration and pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let lga_repo = Arc::new(LgaRepository::new(db_pool.clone()));
        let sticker_repo = Arc::new(StickerRepository::new(db_pool.clone()));
        let batch_repo = Arc::new(BatchRepository::new(db_pool.clone()));
        let beneficiary_repo = Arc::new(BeneficiaryRepository::new(db_pool.clone()));
        let activation_repo = Arc::new(ActivationRepository::new(db_pool.clone()));
        let verification_repo = Arc::new(VerificationLogRepository::new(db_pool.clone()));

        let batch_service = Arc::new(BatchService::new(
            db_pool.clone(),
            Arc::clone(&batch_repo),
            Arc::clone(&sticker_repo),
            Arc::clone(&lga_repo),
            config.permits.clone(),
        ));
        let activation_service = Arc::new(ActivationService::new(
            db_pool.clone(),
            Arc::clone(&sticker_repo),
            Arc::clone(&batch_repo),
            Arc::clone(&beneficiary_repo),
            Arc::clone(&activation_repo),
            Arc::clone(&verification_repo),
            Arc::clone(&lga_repo) as Arc<dyn cartpass_core::traits::PricingProvider>,
            config.permits.clone(),
        ));
        let verification_service = Arc::new(VerificationService::new(
            Arc::clone(&sticker_repo),
            Arc::clone(&beneficiary_repo),
            Arc::clone(&verification_repo),
        ));

        Self {
            config: Arc::new(config),
            db_pool,
            lga_repo,
            sticker_repo,
            batch_repo,
            beneficiary_repo,
            activation_repo,
            verification_repo,
            batch_service,
            activation_service,
            verification_service,
        }
    }
}
