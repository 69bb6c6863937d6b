//! Activation record read paths for receipts and reporting.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use cartpass_core::error::AppError;

use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// GET /api/activations/{receipt_number} — receipt lookup for disputes.
pub async fn get_by_receipt(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Path(receipt_number): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = state
        .activation_repo
        .find_by_receipt(receipt_number.trim())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Receipt '{receipt_number}' not found")))?;

    Ok(Json(serde_json::json!({ "success": true, "data": record })))
}

/// GET /api/lgas/{id}/activations — paginated listing for reporting.
pub async fn list_for_lga(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Path(lga_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.into_page_request();
    let result = state.activation_repo.list_for_lga(lga_id, &page).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/lgas/{id}/stats?since=... — activation count for dashboards.
pub async fn lga_stats(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Path(lga_id): Path<Uuid>,
    Query(filter): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let since = match filter.get("since") {
        Some(raw) => raw
            .parse::<DateTime<Utc>>()
            .map_err(|_| AppError::validation(format!("Invalid timestamp: '{raw}'")))?,
        None => Utc::now() - chrono::Duration::days(30),
    };

    let activations = state
        .sticker_repo
        .count_activated_since(lga_id, since)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "lga_id": lga_id,
            "since": since,
            "activations": activations,
        }
    })))
}
