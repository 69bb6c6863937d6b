//! Batch generation and lifecycle handlers (admin).

use axum::Json;
use axum::extract::{Path, Query, State};
use std::collections::HashMap;
use uuid::Uuid;

use cartpass_core::error::AppError;
use cartpass_entity::batch::BatchStatus;
use cartpass_service::batch::GenerateBatchRequest as SvcGenerateBatch;

use crate::dto::request::GenerateBatchRequest;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// POST /api/batches — bulk-generate a batch of stickers.
pub async fn generate_batch(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Json(req): Json<GenerateBatchRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::forbidden(
            "Batch generation requires an administrator",
        ));
    }

    let result = state
        .batch_service
        .generate(
            &ctx,
            SvcGenerateBatch {
                lga_id: req.lga_id,
                quantity: req.quantity,
                notes: req.notes,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "batch": result.batch,
            "stickers_generated": result.stickers_generated,
        }
    })))
}

/// GET /api/batches?lga_id=...&status=...
pub async fn list_batches(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lga_id = match filter.get("lga_id") {
        Some(raw) => Some(
            raw.parse::<Uuid>()
                .map_err(|_| AppError::validation("Invalid lga_id"))?,
        ),
        None => None,
    };
    let status = match filter.get("status") {
        Some(raw) => Some(raw.parse::<BatchStatus>()?),
        None => None,
    };

    let page = params.into_page_request();
    let result = state.batch_service.list(lga_id, status, page).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": result,
    })))
}

/// GET /api/batches/{id}
pub async fn get_batch(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let batch = state.batch_service.get(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": batch })))
}

/// DELETE /api/batches/{id}
///
/// Refused with `BATCH_HAS_ACTIVATIONS` when any owned sticker has been
/// activated.
pub async fn delete_batch(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::forbidden(
            "Batch deletion requires an administrator",
        ));
    }

    state.batch_service.delete(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": null })))
}

/// POST /api/batches/{id}/cancel
pub async fn cancel_batch(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::forbidden(
            "Batch cancellation requires an administrator",
        ));
    }

    let batch = state.batch_service.cancel(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": batch })))
}
