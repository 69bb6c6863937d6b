//! Public sticker verification handler (no authentication).

use axum::Json;
use axum::extract::State;
use validator::Validate;

use cartpass_core::error::AppError;
use cartpass_entity::verification::VerificationChannel;

use crate::dto::request::VerifyRequest;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// POST /api/verify — anyone may check a sticker's current validity.
///
/// Non-mutating with respect to sticker state; every call appends one
/// verification log entry. The beneficiary is exposed by name only.
pub async fn public_verify(
    State(state): State<AppState>,
    ClientInfo(client): ClientInfo,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .verification_service
        .verify(
            &req.sticker_code,
            None,
            VerificationChannel::Api,
            &client,
            req.geo,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "valid": outcome.valid,
            "result": outcome.result,
            "status": outcome.status,
            "activated_at": outcome.activated_at,
            "expiry_date": outcome.expires_at,
            "days_remaining": outcome.days_remaining,
            "days_overdue": outcome.days_overdue,
            "beneficiary": outcome.beneficiary.map(|b| b.full_name),
        }
    })))
}
