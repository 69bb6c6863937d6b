//! Verification log repository implementation.
//!
//! Entries are append-only; nothing updates or deletes them.

use sqlx::PgPool;

use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::types::pagination::{PageRequest, PageResponse};
use cartpass_entity::verification::{NewVerification, VerificationLogEntry};

/// Repository for the verification audit log.
#[derive(Debug, Clone)]
pub struct VerificationLogRepository {
    pool: PgPool,
}

impl VerificationLogRepository {
    /// Create a new verification log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one log entry. Runs outside the activation transaction so a
    /// logging failure can never roll back a completed activation.
    pub async fn record(&self, entry: &NewVerification) -> AppResult<VerificationLogEntry> {
        sqlx::query_as::<_, VerificationLogEntry>(
            "INSERT INTO verification_log \
             (sticker_id, sticker_code, verified_by, channel, result, \
              ip_address, device_info, latitude, longitude, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(entry.sticker_id)
        .bind(&entry.sticker_code)
        .bind(entry.verified_by)
        .bind(entry.channel)
        .bind(entry.result)
        .bind(&entry.ip_address)
        .bind(&entry.device_info)
        .bind(entry.latitude)
        .bind(entry.longitude)
        .bind(&entry.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to write verification log", e)
        })
    }

    /// Paginated history of checks against one code, most recent first.
    pub async fn history(
        &self,
        sticker_code: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<VerificationLogEntry>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM verification_log WHERE sticker_code = $1",
        )
        .bind(sticker_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count verification log", e)
        })?;

        let entries = sqlx::query_as::<_, VerificationLogEntry>(
            "SELECT * FROM verification_log WHERE sticker_code = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(sticker_code)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read verification log", e)
        })?;

        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
