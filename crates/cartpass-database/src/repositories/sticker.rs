//! Sticker repository implementation.
//!
//! Owns all read/write access to sticker rows. The unused→active
//! transition is a single conditional `UPDATE` so the at-most-once gate
//! lives in the storage layer, not in application logic.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::types::pagination::{PageRequest, PageResponse};
use cartpass_entity::sticker::{ActivateSticker, NewSticker, Sticker, StickerStatus};

/// Rows per bulk-insert statement. Nine bind parameters per row keeps a
/// chunk well under the PostgreSQL bind limit.
const BULK_INSERT_CHUNK: usize = 1_000;

/// Filters for the administrative sticker listing.
#[derive(Debug, Clone, Default)]
pub struct StickerFilter {
    /// Restrict to one LGA.
    pub lga_id: Option<Uuid>,
    /// Restrict to one batch.
    pub batch_id: Option<Uuid>,
    /// Restrict to a stored status.
    pub status: Option<StickerStatus>,
    /// Created on or after this instant.
    pub created_from: Option<DateTime<Utc>>,
    /// Created strictly before this instant.
    pub created_to: Option<DateTime<Utc>>,
}

/// Repository for sticker rows and their state transitions.
#[derive(Debug, Clone)]
pub struct StickerRepository {
    pool: PgPool,
}

impl StickerRepository {
    /// Create a new sticker repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a sticker by its printed code. Read-only, no side effects.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Sticker>> {
        sqlx::query_as::<_, Sticker>("SELECT * FROM stickers WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find sticker", e))
    }

    /// Bulk-insert generated stickers as `unused`, one multi-row statement
    /// per chunk. A code collision surfaces as `DuplicateCode`; the caller
    /// retries the affected chunk with regenerated codes.
    pub async fn bulk_create(
        &self,
        conn: &mut PgConnection,
        stickers: &[NewSticker],
    ) -> AppResult<u64> {
        let mut inserted = 0u64;

        for chunk in stickers.chunks(BULK_INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO stickers (code, qr_payload, lga_id, batch_id, unit_price_kobo) ",
            );
            builder.push_values(chunk, |mut row, sticker| {
                row.push_bind(&sticker.code)
                    .push_bind(&sticker.qr_payload)
                    .push_bind(sticker.lga_id)
                    .push_bind(sticker.batch_id)
                    .push_bind(sticker.unit_price_kobo);
            });

            let result = builder.build().execute(&mut *conn).await.map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("stickers_code_key") =>
                {
                    AppError::new(
                        ErrorKind::DuplicateCode,
                        "A generated sticker code collided with an existing code",
                    )
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to bulk-insert stickers", e),
            })?;

            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// The atomic unused→active transition.
    ///
    /// A single conditional `UPDATE ... WHERE code = $1 AND status = 'unused'`
    /// is the sole gate: of N concurrent attempts on the same code exactly
    /// one sees a row, and the rest are classified by re-reading the row the
    /// winner left behind. Must be called inside the activation transaction.
    pub async fn activate(
        &self,
        conn: &mut PgConnection,
        code: &str,
        data: &ActivateSticker,
    ) -> AppResult<Sticker> {
        let updated = sqlx::query_as::<_, Sticker>(
            "UPDATE stickers \
             SET status = 'active', activated_by = $2, activated_at = $3, \
                 expires_at = $4, beneficiary_id = $5, updated_at = NOW() \
             WHERE code = $1 AND status = 'unused' \
             RETURNING *",
        )
        .bind(code)
        .bind(data.activated_by)
        .bind(data.activated_at)
        .bind(data.expires_at)
        .bind(data.beneficiary_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to activate sticker", e))?;

        if let Some(sticker) = updated {
            return Ok(sticker);
        }

        // Zero rows affected: the gate refused. Re-read to tell the caller why.
        let existing = sqlx::query_as::<_, Sticker>("SELECT * FROM stickers WHERE code = $1")
            .bind(code)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to re-read sticker", e))?;

        match existing {
            None => Err(AppError::not_found(format!("Sticker '{code}' not found"))),
            Some(s) if s.status == StickerStatus::Revoked => Err(AppError::conflict(format!(
                "Sticker '{code}' has been revoked"
            ))),
            Some(s) => Err(AppError::already_activated(s.activated_at, s.activated_by)),
        }
    }

    /// Administrative any→revoked transition.
    pub async fn revoke(&self, code: &str) -> AppResult<Sticker> {
        let revoked = sqlx::query_as::<_, Sticker>(
            "UPDATE stickers SET status = 'revoked', updated_at = NOW() \
             WHERE code = $1 AND status <> 'revoked' RETURNING *",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke sticker", e))?;

        match revoked {
            Some(sticker) => Ok(sticker),
            None => match self.find_by_code(code).await? {
                Some(_) => Err(AppError::conflict(format!(
                    "Sticker '{code}' is already revoked"
                ))),
                None => Err(AppError::not_found(format!("Sticker '{code}' not found"))),
            },
        }
    }

    /// Filtered, paginated listing for administrative and reporting callers.
    pub async fn search(
        &self,
        filter: &StickerFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Sticker>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.lga_id.is_some() {
            conditions.push(format!("lga_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.batch_id.is_some() {
            conditions.push(format!("batch_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.created_from.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }
        if filter.created_to.is_some() {
            conditions.push(format!("created_at < ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM stickers {where_clause}");
        let select_sql = format!(
            "SELECT * FROM stickers {where_clause} ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, Sticker>(&select_sql);

        if let Some(lga_id) = filter.lga_id {
            count_query = count_query.bind(lga_id);
            select_query = select_query.bind(lga_id);
        }
        if let Some(batch_id) = filter.batch_id {
            count_query = count_query.bind(batch_id);
            select_query = select_query.bind(batch_id);
        }
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
            select_query = select_query.bind(status);
        }
        if let Some(from) = filter.created_from {
            count_query = count_query.bind(from);
            select_query = select_query.bind(from);
        }
        if let Some(to) = filter.created_to {
            count_query = count_query.bind(to);
            select_query = select_query.bind(to);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count stickers", e)
        })?;

        let stickers = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search stickers", e)
            })?;

        Ok(PageResponse::new(
            stickers,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count stickers of a batch that have ever been activated.
    pub async fn count_activated_in_batch(
        &self,
        conn: &mut PgConnection,
        batch_id: Uuid,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM stickers WHERE batch_id = $1 AND activated_at IS NOT NULL",
        )
        .bind(batch_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count activated stickers", e)
        })
    }

    /// Delete a batch's never-activated stickers. Used by batch deletion.
    pub async fn delete_unused_by_batch(
        &self,
        conn: &mut PgConnection,
        batch_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM stickers WHERE batch_id = $1 AND activated_at IS NULL",
        )
        .bind(batch_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete unused stickers", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Revoke a batch's remaining unused stickers. Used by batch cancel.
    pub async fn revoke_unused_by_batch(
        &self,
        conn: &mut PgConnection,
        batch_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE stickers SET status = 'revoked', updated_at = NOW() \
             WHERE batch_id = $1 AND status = 'unused'",
        )
        .bind(batch_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke unused stickers", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Count activations under an LGA since an instant, for reporting.
    pub async fn count_activated_since(
        &self,
        lga_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM stickers WHERE lga_id = $1 AND activated_at >= $2",
        )
        .bind(lga_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count recent activations", e)
        })
    }
}
