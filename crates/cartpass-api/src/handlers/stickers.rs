//! Sticker lookup, search, activation, and revocation handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use cartpass_core::error::AppError;
use cartpass_core::types::money::Kobo;
use cartpass_entity::sticker::StickerStatus;
use cartpass_entity::verification::VerificationChannel;
use cartpass_database::repositories::sticker::StickerFilter;
use cartpass_service::sticker::ActivationRequest as SvcActivation;

use crate::dto::request::{ActivateStickerRequest, RevokeStickerRequest};
use crate::dto::response::{ActivationResponse, ApiResponse};
use crate::extractors::{Actor, ClientInfo, PaginationParams};
use crate::state::AppState;

/// POST /api/stickers/activate — the officer-initiated activation.
pub async fn activate_sticker(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    ClientInfo(client): ClientInfo,
    Json(req): Json<ActivateStickerRequest>,
) -> Result<Json<ApiResponse<ActivationResponse>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let summary = state
        .activation_service
        .activate(
            &ctx,
            &client,
            SvcActivation {
                sticker_code: req.sticker_code,
                beneficiary_name: req.beneficiary_name,
                beneficiary_phone: req.beneficiary_phone,
                duration_months: req.duration_months,
                // Field devices send whole Naira; kobo is canonical from
                // here on.
                amount_paid: Kobo::from_naira(req.amount_paid),
                payment_method: req.payment_method,
                activated_at_override: req.activated_at,
                geo: req.geo,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(ActivationResponse::from(summary))))
}

/// GET /api/stickers/{code}
pub async fn get_sticker(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sticker = state
        .sticker_repo
        .find_by_code(code.trim())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sticker '{code}' not found")))?;

    let now = Utc::now();
    let effective_status = sticker.effective_status(now);
    let days_remaining = sticker.days_remaining(now);
    let days_overdue = sticker.days_overdue(now);

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "sticker": sticker,
            "effective_status": effective_status,
            "days_remaining": days_remaining,
            "days_overdue": days_overdue,
        }
    })))
}

/// GET /api/stickers?lga_id=...&batch_id=...&status=...&from=...&to=...
pub async fn search_stickers(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut sticker_filter = StickerFilter::default();

    if let Some(raw) = filter.get("lga_id") {
        sticker_filter.lga_id = Some(
            raw.parse::<Uuid>()
                .map_err(|_| AppError::validation("Invalid lga_id"))?,
        );
    }
    if let Some(raw) = filter.get("batch_id") {
        sticker_filter.batch_id = Some(
            raw.parse::<Uuid>()
                .map_err(|_| AppError::validation("Invalid batch_id"))?,
        );
    }
    if let Some(raw) = filter.get("status") {
        sticker_filter.status = Some(raw.parse::<StickerStatus>()?);
    }
    if let Some(raw) = filter.get("from") {
        sticker_filter.created_from = Some(parse_timestamp(raw)?);
    }
    if let Some(raw) = filter.get("to") {
        sticker_filter.created_to = Some(parse_timestamp(raw)?);
    }

    let page = params.into_page_request();
    let result = state.sticker_repo.search(&sticker_filter, &page).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": result,
    })))
}

/// GET /api/stickers/{code}/verify — officer-facing verification.
pub async fn officer_verify(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    ClientInfo(client): ClientInfo,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state
        .verification_service
        .verify(
            &code,
            Some(ctx.actor_id),
            VerificationChannel::Manual,
            &client,
            None,
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": outcome })))
}

/// GET /api/stickers/{code}/verifications — audit history.
pub async fn verification_history(
    State(state): State<AppState>,
    Actor(_ctx): Actor,
    Path(code): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.into_page_request();
    let history = state.verification_service.history(&code, page).await?;

    Ok(Json(serde_json::json!({ "success": true, "data": history })))
}

/// POST /api/stickers/{code}/revoke — administrative revocation.
///
/// Permitted from any state, including already-expired stickers; never
/// releases the owning batch's usage counter.
pub async fn revoke_sticker(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(code): Path<String>,
    Json(req): Json<RevokeStickerRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::forbidden(
            "Sticker revocation requires an administrator",
        ));
    }

    let sticker = state.sticker_repo.revoke(code.trim()).await?;

    info!(
        actor_id = %ctx.actor_id,
        sticker_code = %sticker.code,
        reason = req.reason.as_deref().unwrap_or("unspecified"),
        "Sticker revoked"
    );

    Ok(Json(serde_json::json!({ "success": true, "data": sticker })))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    raw.parse::<DateTime<Utc>>()
        .map_err(|_| AppError::validation(format!("Invalid timestamp: '{raw}'")))
}
