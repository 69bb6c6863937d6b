//! Sticker status enumeration and lazy-expiry derivation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle states of a sticker.
///
/// `Expired` is derived, not stored-authoritative: a row whose stored
/// status is `active` with a past `expires_at` reads as expired without a
/// background job rewriting it. Only activation and revocation write the
/// status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sticker_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StickerStatus {
    /// Created in bulk, never activated.
    Unused,
    /// Activated and within its paid period.
    Active,
    /// Past its expiry timestamp (derived on read).
    Expired,
    /// Administratively withdrawn.
    Revoked,
}

impl StickerStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for StickerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StickerStatus {
    type Err = cartpass_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unused" => Ok(Self::Unused),
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "revoked" => Ok(Self::Revoked),
            _ => Err(cartpass_core::AppError::validation(format!(
                "Invalid sticker status: '{s}'. Expected one of: unused, active, expired, revoked"
            ))),
        }
    }
}

/// Derive the logical status from the stored status and expiry timestamp.
///
/// This is the single derivation point used by every read path
/// (verification, lookup, reporting), so "is this logically expired"
/// exists exactly once.
pub fn derive_status(
    stored: StickerStatus,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StickerStatus {
    match (stored, expires_at) {
        (StickerStatus::Active, Some(expiry)) if now > expiry => StickerStatus::Expired,
        _ => stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn active_within_period_stays_active() {
        let now = Utc::now();
        let expiry = now + Duration::days(30);
        assert_eq!(
            derive_status(StickerStatus::Active, Some(expiry), now + Duration::days(29)),
            StickerStatus::Active
        );
    }

    #[test]
    fn active_past_expiry_reads_expired() {
        let now = Utc::now();
        let expiry = now + Duration::days(30);
        assert_eq!(
            derive_status(StickerStatus::Active, Some(expiry), now + Duration::days(31)),
            StickerStatus::Expired
        );
    }

    #[test]
    fn unused_and_revoked_are_untouched() {
        let now = Utc::now();
        let past = now - Duration::days(10);
        assert_eq!(
            derive_status(StickerStatus::Unused, None, now),
            StickerStatus::Unused
        );
        assert_eq!(
            derive_status(StickerStatus::Revoked, Some(past), now),
            StickerStatus::Revoked
        );
    }

    #[test]
    fn parse_round_trip() {
        assert_eq!(
            "active".parse::<StickerStatus>().unwrap(),
            StickerStatus::Active
        );
        assert!("broken".parse::<StickerStatus>().is_err());
    }
}
