//! Sticker batch repository implementation.
//!
//! The usage counter is only ever moved by an atomic in-database
//! increment; application code never computes `used_count` from a value it
//! read earlier.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::types::pagination::{PageRequest, PageResponse};
use cartpass_entity::batch::{BatchStatus, NewBatch, StickerBatch};

/// Repository for batch metadata and usage accounting.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    pool: PgPool,
}

impl BatchRepository {
    /// Create a new batch repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a batch by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StickerBatch>> {
        sqlx::query_as::<_, StickerBatch>("SELECT * FROM sticker_batches WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find batch", e))
    }

    /// Find a batch by its code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<StickerBatch>> {
        sqlx::query_as::<_, StickerBatch>("SELECT * FROM sticker_batches WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find batch", e))
    }

    /// The most recently created batch code for a year, used to compute the
    /// next sequence number.
    pub async fn latest_code_for_year(
        &self,
        conn: &mut PgConnection,
        year: i32,
    ) -> AppResult<Option<String>> {
        sqlx::query_scalar(
            "SELECT code FROM sticker_batches WHERE code LIKE $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(format!("BATCH-{year}-%"))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read latest batch code", e)
        })
    }

    /// Persist batch metadata with `used_count = 0`.
    ///
    /// A concurrent generation racing to the same code hits the unique
    /// constraint; the caller recomputes the sequence and retries a bounded
    /// number of times.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        batch: &NewBatch,
    ) -> AppResult<StickerBatch> {
        sqlx::query_as::<_, StickerBatch>(
            "INSERT INTO sticker_batches \
             (code, lga_id, quantity, prefix, number_start, number_end, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&batch.code)
        .bind(batch.lga_id)
        .bind(batch.quantity)
        .bind(&batch.prefix)
        .bind(batch.number_start)
        .bind(batch.number_end)
        .bind(&batch.notes)
        .bind(batch.created_by)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("sticker_batches_code_key") =>
            {
                AppError::conflict(format!("Batch code '{}' already exists", batch.code))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create batch", e),
        })
    }

    /// Filtered, paginated batch listing.
    pub async fn list(
        &self,
        lga_id: Option<Uuid>,
        status: Option<BatchStatus>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<StickerBatch>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if lga_id.is_some() {
            conditions.push(format!("lga_id = ${param_idx}"));
            param_idx += 1;
        }
        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM sticker_batches {where_clause}");
        let select_sql = format!(
            "SELECT * FROM sticker_batches {where_clause} ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, StickerBatch>(&select_sql);

        if let Some(lga_id) = lga_id {
            count_query = count_query.bind(lga_id);
            select_query = select_query.bind(lga_id);
        }
        if let Some(status) = status {
            count_query = count_query.bind(status);
            select_query = select_query.bind(status);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count batches", e))?;

        let batches = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list batches", e))?;

        Ok(PageResponse::new(
            batches,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Atomically increment `used_count`, flipping the batch to `depleted`
    /// in the same statement once remaining capacity reaches zero.
    ///
    /// The `used_count + $2 <= quantity` guard makes capacity overruns
    /// impossible even under concurrent increments.
    pub async fn increment_used(
        &self,
        conn: &mut PgConnection,
        batch_id: Uuid,
        count: i64,
    ) -> AppResult<StickerBatch> {
        let updated = sqlx::query_as::<_, StickerBatch>(
            "UPDATE sticker_batches \
             SET used_count = used_count + $2, \
                 status = CASE \
                     WHEN used_count + $2 >= quantity AND status = 'active' THEN 'depleted'::batch_status \
                     ELSE status \
                 END, \
                 updated_at = NOW() \
             WHERE id = $1 AND used_count + $2 <= quantity \
             RETURNING *",
        )
        .bind(batch_id)
        .bind(count)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment batch counter", e)
        })?;

        updated.ok_or_else(|| {
            AppError::conflict(format!(
                "Batch {batch_id} not found or increment would exceed its quantity"
            ))
        })
    }

    /// Administrative status update (expired, cancelled).
    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        batch_id: Uuid,
        status: BatchStatus,
    ) -> AppResult<StickerBatch> {
        sqlx::query_as::<_, StickerBatch>(
            "UPDATE sticker_batches SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(batch_id)
        .bind(status)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update batch status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Batch {batch_id} not found")))
    }

    /// Delete the batch row itself. Callers must have removed or checked
    /// the owned stickers first.
    pub async fn delete(&self, conn: &mut PgConnection, batch_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sticker_batches WHERE id = $1")
            .bind(batch_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete batch", e))?;
        Ok(result.rows_affected() > 0)
    }
}
