//! LGA repository implementation.
//!
//! Also implements the [`PricingProvider`] seam: the activation workflow
//! reads the LGA's current price through this trait at activation time.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::traits::PricingProvider;
use cartpass_core::types::money::Kobo;
use cartpass_entity::lga::Lga;

/// Repository for Local Government Areas.
#[derive(Debug, Clone)]
pub struct LgaRepository {
    pool: PgPool,
}

impl LgaRepository {
    /// Create a new LGA repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an LGA by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Lga>> {
        sqlx::query_as::<_, Lga>("SELECT * FROM lgas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find LGA", e))
    }

    /// Find an LGA by its short code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Lga>> {
        sqlx::query_as::<_, Lga>("SELECT * FROM lgas WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find LGA", e))
    }

    /// Register an LGA.
    pub async fn create(
        &self,
        name: &str,
        code: &str,
        state_name: Option<&str>,
        sticker_price: Kobo,
    ) -> AppResult<Lga> {
        sqlx::query_as::<_, Lga>(
            "INSERT INTO lgas (name, code, state_name, sticker_price_kobo) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(name)
        .bind(code)
        .bind(state_name)
        .bind(sticker_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("lgas_code_key") => {
                AppError::conflict(format!("LGA code '{code}' already exists"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create LGA", e),
        })
    }

    /// Update the configured sticker price.
    pub async fn update_price(&self, id: Uuid, price: Kobo) -> AppResult<Lga> {
        sqlx::query_as::<_, Lga>(
            "UPDATE lgas SET sticker_price_kobo = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update LGA price", e))?
        .ok_or_else(|| AppError::not_found(format!("LGA {id} not found")))
    }
}

#[async_trait]
impl PricingProvider for LgaRepository {
    async fn current_unit_price(&self, lga_id: Uuid) -> AppResult<Option<Kobo>> {
        let price: Option<Kobo> =
            sqlx::query_scalar("SELECT sticker_price_kobo FROM lgas WHERE id = $1")
                .bind(lga_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read LGA price", e)
                })?;

        Ok(price.filter(|p| p.value() > 0))
    }
}
