//! Request context carrying the acting officer and client metadata.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role hierarchy of actors permitted to perform operations.
///
/// Authentication and authorization happen upstream; the core treats the
/// role as an opaque privilege level for route gating only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActorRole {
    /// Full platform administrator.
    SuperAdmin,
    /// Administrator of a single LGA.
    LgaAdmin,
    /// Supervises field officers within an LGA.
    Supervisor,
    /// Field officer performing activations and checks.
    Officer,
}

impl ActorRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::SuperAdmin => 4,
            Self::LgaAdmin => 3,
            Self::Supervisor => 2,
            Self::Officer => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &ActorRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Return the role as a kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::LgaAdmin => "lga-admin",
            Self::Supervisor => "supervisor",
            Self::Officer => "officer",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = cartpass_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "super-admin" | "super_admin" => Ok(Self::SuperAdmin),
            "lga-admin" | "lga_admin" => Ok(Self::LgaAdmin),
            "supervisor" => Ok(Self::Supervisor),
            "officer" => Ok(Self::Officer),
            _ => Err(cartpass_core::AppError::validation(format!(
                "Invalid actor role: '{s}'. Expected one of: super-admin, lga-admin, supervisor, officer"
            ))),
        }
    }
}

/// Context for the current authenticated request.
///
/// Materialized from gateway-injected headers by the API layer and passed
/// into service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting officer/supervisor/admin's ID.
    pub actor_id: Uuid,
    /// Display name resolved by the identity collaborator.
    pub actor_name: String,
    /// The actor's role.
    pub role: ActorRole,
    /// The LGA the actor belongs to, when scoped.
    pub lga_id: Option<Uuid>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor_id: Uuid, actor_name: String, role: ActorRole, lga_id: Option<Uuid>) -> Self {
        Self {
            actor_id,
            actor_name,
            role,
            lga_id,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the actor may perform batch administration.
    pub fn is_admin(&self) -> bool {
        self.role.has_at_least(&ActorRole::LgaAdmin)
    }
}

/// Client metadata captured per request for the verification log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientMeta {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client device description (User-Agent).
    pub device_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_ordering() {
        assert!(ActorRole::SuperAdmin.has_at_least(&ActorRole::Officer));
        assert!(ActorRole::LgaAdmin.has_at_least(&ActorRole::LgaAdmin));
        assert!(!ActorRole::Officer.has_at_least(&ActorRole::Supervisor));
    }

    #[test]
    fn role_parse_round_trip() {
        assert_eq!(
            "super-admin".parse::<ActorRole>().unwrap(),
            ActorRole::SuperAdmin
        );
        assert_eq!(
            "lga_admin".parse::<ActorRole>().unwrap(),
            ActorRole::LgaAdmin
        );
        assert!("root".parse::<ActorRole>().is_err());
    }
}
