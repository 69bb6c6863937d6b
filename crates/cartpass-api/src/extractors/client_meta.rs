//! Client metadata extractor for the verification log.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

use cartpass_service::context::ClientMeta;

/// Best-effort client IP and device description. Never rejects.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientMeta);

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        // The first entry of X-Forwarded-For is the original client when
        // the gateway appends its own hop.
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let device_info = headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Ok(Self(ClientMeta {
            ip_address,
            device_info,
        }))
    }
}
