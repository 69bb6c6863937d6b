//! Batch generation, deletion, and cancellation.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use sqlx::{Acquire, PgPool};
use tracing::info;
use uuid::Uuid;

use cartpass_core::config::permits::PermitConfig;
use cartpass_core::error::{AppError, ErrorKind};
use cartpass_core::result::AppResult;
use cartpass_core::traits::PricingProvider;
use cartpass_core::types::pagination::{PageRequest, PageResponse};
use cartpass_database::repositories::batch::BatchRepository;
use cartpass_database::repositories::lga::LgaRepository;
use cartpass_database::repositories::sticker::StickerRepository;
use cartpass_entity::batch::{BatchStatus, NewBatch, StickerBatch};
use cartpass_entity::sticker::NewSticker;

use crate::codegen;
use crate::context::RequestContext;

/// Bounded retry budget for batch-code conflicts.
const BATCH_CODE_RETRY_ATTEMPTS: u32 = 5;

/// Admin request to bulk-generate a batch of stickers.
#[derive(Debug, Clone)]
pub struct GenerateBatchRequest {
    /// The LGA to generate for.
    pub lga_id: Uuid,
    /// Number of stickers to generate.
    pub quantity: i64,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Result of a bulk generation run.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    /// The created batch.
    pub batch: StickerBatch,
    /// How many stickers were persisted.
    pub stickers_generated: u64,
}

/// Orchestrates batch metadata and bulk sticker generation.
#[derive(Debug, Clone)]
pub struct BatchService {
    pool: PgPool,
    batch_repo: Arc<BatchRepository>,
    sticker_repo: Arc<StickerRepository>,
    lga_repo: Arc<LgaRepository>,
    config: PermitConfig,
}

impl BatchService {
    /// Creates a new batch service.
    pub fn new(
        pool: PgPool,
        batch_repo: Arc<BatchRepository>,
        sticker_repo: Arc<StickerRepository>,
        lga_repo: Arc<LgaRepository>,
        config: PermitConfig,
    ) -> Self {
        Self {
            pool,
            batch_repo,
            sticker_repo,
            lga_repo,
            config,
        }
    }

    /// Generate a batch and its stickers in a single transaction.
    ///
    /// The batch code and every sticker code are insert-with-retry under
    /// savepoints: a unique-constraint loss recomputes only the affected
    /// piece instead of abandoning the whole run.
    pub async fn generate(
        &self,
        ctx: &RequestContext,
        req: GenerateBatchRequest,
    ) -> AppResult<GeneratedBatch> {
        if req.quantity < self.config.min_batch_quantity
            || req.quantity > self.config.max_batch_quantity
        {
            return Err(AppError::validation(format!(
                "Batch quantity must be between {} and {}",
                self.config.min_batch_quantity, self.config.max_batch_quantity
            )));
        }

        let lga = self
            .lga_repo
            .find_by_id(req.lga_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("LGA {} not found", req.lga_id)))?;

        let unit_price = self
            .lga_repo
            .current_unit_price(lga.id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "LGA '{}' has no configured sticker price",
                    lga.code
                ))
            })?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Batch code: read latest, compute next, insert under a savepoint,
        // retry on conflict with a recomputed sequence.
        let year = Utc::now().year();
        let mut batch: Option<StickerBatch> = None;
        for _attempt in 0..BATCH_CODE_RETRY_ATTEMPTS {
            let latest = self.batch_repo.latest_code_for_year(&mut tx, year).await?;
            let code = codegen::next_batch_code(year, latest.as_deref());

            let new_batch = NewBatch {
                code,
                lga_id: lga.id,
                quantity: req.quantity,
                prefix: lga.code.clone(),
                number_start: 1,
                number_end: i32::try_from(req.quantity)
                    .map_err(|_| AppError::validation("Batch quantity out of range"))?,
                notes: req.notes.clone(),
                created_by: ctx.actor_id,
            };

            let mut savepoint = tx.begin().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
            })?;
            match self.batch_repo.create(&mut savepoint, &new_batch).await {
                Ok(created) => {
                    savepoint.commit().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to commit savepoint", e)
                    })?;
                    batch = Some(created);
                    break;
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    savepoint.rollback().await.map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Database,
                            "Failed to roll back savepoint",
                            e,
                        )
                    })?;
                }
                Err(e) => return Err(e),
            }
        }
        let batch =
            batch.ok_or_else(|| AppError::internal("Exhausted batch code retries"))?;

        // Stickers: generate and insert chunk by chunk. A duplicate code
        // regenerates only the affected chunk.
        let mut stickers_generated = 0u64;
        let chunk_size = self.config.insert_chunk_size.max(1);
        let mut sequence = 1u32;
        let mut remaining = req.quantity;

        while remaining > 0 {
            let count = remaining.min(chunk_size as i64) as usize;
            let mut inserted = false;

            for _attempt in 0..self.config.code_retry_attempts {
                let chunk: Vec<NewSticker> = (0..count)
                    .map(|i| {
                        let code = codegen::sticker_code(&lga.code, sequence + i as u32);
                        NewSticker {
                            qr_payload: code.clone(),
                            code,
                            lga_id: lga.id,
                            batch_id: batch.id,
                            unit_price_kobo: unit_price,
                        }
                    })
                    .collect();

                let mut savepoint = tx.begin().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
                })?;
                match self.sticker_repo.bulk_create(&mut savepoint, &chunk).await {
                    Ok(n) => {
                        savepoint.commit().await.map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to commit savepoint",
                                e,
                            )
                        })?;
                        stickers_generated += n;
                        inserted = true;
                        break;
                    }
                    Err(e) if e.kind == ErrorKind::DuplicateCode => {
                        savepoint.rollback().await.map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to roll back savepoint",
                                e,
                            )
                        })?;
                        tracing::debug!(batch_code = %batch.code, "Sticker code collision, regenerating chunk");
                    }
                    Err(e) => return Err(e),
                }
            }

            if !inserted {
                return Err(AppError::duplicate_code(format!(
                    "batch {} chunk at sequence {sequence}",
                    batch.code
                )));
            }

            sequence += count as u32;
            remaining -= count as i64;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit batch generation", e)
        })?;

        info!(
            actor_id = %ctx.actor_id,
            batch_code = %batch.code,
            lga = %lga.code,
            stickers_generated,
            "Batch generated"
        );

        Ok(GeneratedBatch {
            batch,
            stickers_generated,
        })
    }

    /// Get a batch by ID.
    pub async fn get(&self, batch_id: Uuid) -> AppResult<StickerBatch> {
        self.batch_repo
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Batch {batch_id} not found")))
    }

    /// Paginated batch listing.
    pub async fn list(
        &self,
        lga_id: Option<Uuid>,
        status: Option<BatchStatus>,
        page: PageRequest,
    ) -> AppResult<PageResponse<StickerBatch>> {
        self.batch_repo.list(lga_id, status, &page).await
    }

    /// Delete a batch and its stickers.
    ///
    /// Refused with `BatchHasActivations` when any owned sticker has ever
    /// been activated; the check and the deletion share one transaction so
    /// a concurrent activation cannot slip between them.
    pub async fn delete(&self, ctx: &RequestContext, batch_id: Uuid) -> AppResult<()> {
        let batch = self.get(batch_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let activated = self
            .sticker_repo
            .count_activated_in_batch(&mut tx, batch_id)
            .await?;
        if activated > 0 {
            return Err(AppError::batch_has_activations(batch.code, activated));
        }

        let removed = self
            .sticker_repo
            .delete_unused_by_batch(&mut tx, batch_id)
            .await?;
        self.batch_repo.delete(&mut tx, batch_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit batch deletion", e)
        })?;

        info!(
            actor_id = %ctx.actor_id,
            batch_code = %batch.code,
            stickers_removed = removed,
            "Batch deleted"
        );

        Ok(())
    }

    /// Cancel a batch: revoke its remaining unused stickers and mark the
    /// batch `cancelled`, so the sticker row stays the single authority
    /// consulted at activation time.
    pub async fn cancel(&self, ctx: &RequestContext, batch_id: Uuid) -> AppResult<StickerBatch> {
        let batch = self.get(batch_id).await?;
        if batch.status == BatchStatus::Cancelled {
            return Err(AppError::conflict(format!(
                "Batch '{}' is already cancelled",
                batch.code
            )));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let revoked = self
            .sticker_repo
            .revoke_unused_by_batch(&mut tx, batch_id)
            .await?;
        let cancelled = self
            .batch_repo
            .update_status(&mut tx, batch_id, BatchStatus::Cancelled)
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit batch cancellation", e)
        })?;

        info!(
            actor_id = %ctx.actor_id,
            batch_code = %cancelled.code,
            stickers_revoked = revoked,
            "Batch cancelled"
        );

        Ok(cancelled)
    }
}
