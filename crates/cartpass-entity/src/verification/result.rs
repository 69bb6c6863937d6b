//! Verification outcome classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sticker::StickerStatus;

/// The channel a verification attempt arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_channel", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerificationChannel {
    /// An officer checking in the field.
    Manual,
    /// The public lookup endpoint.
    Api,
}

/// Outcome of a verification or activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_result", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerificationResult {
    /// Sticker is active and within its paid period.
    Success,
    /// Rejected for any other reason (revoked, not yet activated).
    Failed,
    /// Sticker was activated but the period has lapsed.
    Expired,
    /// Code does not resolve to any sticker.
    Invalid,
}

impl VerificationResult {
    /// Classify a lookup outcome. Used identically by the officer-facing
    /// and public-facing verification paths.
    pub fn classify(effective_status: Option<StickerStatus>) -> Self {
        match effective_status {
            None => Self::Invalid,
            Some(StickerStatus::Active) => Self::Success,
            Some(StickerStatus::Expired) => Self::Expired,
            Some(StickerStatus::Unused | StickerStatus::Revoked) => Self::Failed,
        }
    }

    /// Return the result as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_covers_every_state() {
        assert_eq!(
            VerificationResult::classify(None),
            VerificationResult::Invalid
        );
        assert_eq!(
            VerificationResult::classify(Some(StickerStatus::Active)),
            VerificationResult::Success
        );
        assert_eq!(
            VerificationResult::classify(Some(StickerStatus::Expired)),
            VerificationResult::Expired
        );
        assert_eq!(
            VerificationResult::classify(Some(StickerStatus::Unused)),
            VerificationResult::Failed
        );
        assert_eq!(
            VerificationResult::classify(Some(StickerStatus::Revoked)),
            VerificationResult::Failed
        );
    }
}
