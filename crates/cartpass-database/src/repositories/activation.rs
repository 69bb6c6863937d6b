//! Activation record repository implementation.
//!
//! Receipt numbers are a date-scoped sequence backed by a unique
//! constraint. Generation is compute-and-retry under a savepoint so a
//! losing race does not poison the enclosing activation transaction.

use sqlx::{Acquire, PgPool, Postgres, Transaction};
use uuid::Uuid;

use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::types::pagination::{PageRequest, PageResponse};
use cartpass_entity::activation::{ActivationRecord, NewActivation};

/// Bounded retry budget for receipt-number collisions.
const RECEIPT_RETRY_ATTEMPTS: u32 = 3;

/// Repository for activation (receipt) records.
#[derive(Debug, Clone)]
pub struct ActivationRepository {
    pool: PgPool,
}

impl ActivationRepository {
    /// Create a new activation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write the activation record inside the caller's transaction,
    /// generating a `RCP-YYYYMMDD-NNN` receipt number.
    ///
    /// Each attempt runs under a savepoint: a unique-constraint loss to a
    /// concurrent activation rolls back only the savepoint, the sequence is
    /// recomputed, and the insert retries up to the bounded budget.
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        data: &NewActivation,
    ) -> AppResult<ActivationRecord> {
        let prefix = format!("RCP-{}", data.activated_at.format("%Y%m%d"));

        for attempt in 0..RECEIPT_RETRY_ATTEMPTS {
            let existing: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM activations WHERE receipt_number LIKE $1")
                    .bind(format!("{prefix}-%"))
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Database,
                            "Failed to count today's receipts",
                            e,
                        )
                    })?;

            let receipt_number = format!("{prefix}-{:03}", existing + 1 + i64::from(attempt));

            let mut savepoint = tx.begin().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
            })?;

            let inserted = sqlx::query_as::<_, ActivationRecord>(
                "INSERT INTO activations \
                 (receipt_number, sticker_id, beneficiary_id, lga_id, activated_by, \
                  activated_at, expires_at, duration_months, amount_paid_kobo, \
                  payment_method, latitude, longitude) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
            )
            .bind(&receipt_number)
            .bind(data.sticker_id)
            .bind(data.beneficiary_id)
            .bind(data.lga_id)
            .bind(data.activated_by)
            .bind(data.activated_at)
            .bind(data.expires_at)
            .bind(data.duration_months)
            .bind(data.amount_paid_kobo)
            .bind(&data.payment_method)
            .bind(data.latitude)
            .bind(data.longitude)
            .fetch_one(&mut *savepoint)
            .await;

            match inserted {
                Ok(record) => {
                    savepoint.commit().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to commit savepoint", e)
                    })?;
                    return Ok(record);
                }
                Err(sqlx::Error::Database(ref db_err))
                    if db_err.constraint() == Some("activations_receipt_number_key") =>
                {
                    savepoint.rollback().await.map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Database,
                            "Failed to roll back savepoint",
                            e,
                        )
                    })?;
                    tracing::debug!(
                        receipt_number,
                        attempt,
                        "Receipt number collided, retrying"
                    );
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Database,
                        "Failed to create activation record",
                        e,
                    ));
                }
            }
        }

        Err(AppError::internal(
            "Exhausted receipt number retries for activation record",
        ))
    }

    /// All activation records for a sticker, most recent first.
    pub async fn find_by_sticker(&self, sticker_id: Uuid) -> AppResult<Vec<ActivationRecord>> {
        sqlx::query_as::<_, ActivationRecord>(
            "SELECT * FROM activations WHERE sticker_id = $1 ORDER BY activated_at DESC",
        )
        .bind(sticker_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activations", e))
    }

    /// Find an activation by its receipt number.
    pub async fn find_by_receipt(&self, receipt_number: &str) -> AppResult<Option<ActivationRecord>> {
        sqlx::query_as::<_, ActivationRecord>(
            "SELECT * FROM activations WHERE receipt_number = $1",
        )
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find activation", e))
    }

    /// Paginated activation listing for an LGA, for reporting collaborators.
    pub async fn list_for_lga(
        &self,
        lga_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivationRecord>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM activations WHERE lga_id = $1")
                .bind(lga_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count activations", e)
                })?;

        let records = sqlx::query_as::<_, ActivationRecord>(
            "SELECT * FROM activations WHERE lga_id = $1 \
             ORDER BY activated_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(lga_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activations", e))?;

        Ok(PageResponse::new(
            records,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
