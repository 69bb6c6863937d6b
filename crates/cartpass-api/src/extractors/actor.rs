//! Actor identity extractor.
//!
//! Authentication happens at the upstream gateway, which resolves the
//! session and injects the acting officer's identity as headers. This
//! extractor materializes those headers into a typed [`RequestContext`];
//! the core only ever sees the actor as an opaque reference.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use uuid::Uuid;

use cartpass_core::error::AppError;
use cartpass_service::context::{ActorRole, RequestContext};

/// Header carrying the authenticated actor's ID.
const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the actor's resolved display name.
const ACTOR_NAME_HEADER: &str = "x-actor-name";
/// Header carrying the actor's role.
const ACTOR_ROLE_HEADER: &str = "x-actor-role";
/// Header carrying the actor's LGA scope, when scoped.
const ACTOR_LGA_HEADER: &str = "x-actor-lga";

/// The authenticated actor for officer- and admin-facing routes.
#[derive(Debug, Clone)]
pub struct Actor(pub RequestContext);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        let actor_id = required_header(headers, ACTOR_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| AppError::forbidden("Malformed actor identity"))?;

        let actor_name = required_header(headers, ACTOR_NAME_HEADER)?.to_string();

        let role = required_header(headers, ACTOR_ROLE_HEADER)?
            .parse::<ActorRole>()
            .map_err(|_| AppError::forbidden("Unknown actor role"))?;

        let lga_id = match header_value(headers, ACTOR_LGA_HEADER) {
            Some(raw) => Some(
                raw.parse::<Uuid>()
                    .map_err(|_| AppError::forbidden("Malformed actor LGA scope"))?,
            ),
            None => None,
        };

        Ok(Self(RequestContext::new(actor_id, actor_name, role, lga_id)))
    }
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn required_header<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, AppError> {
    header_value(headers, name)
        .ok_or_else(|| AppError::forbidden(format!("Missing '{name}' header")))
}
