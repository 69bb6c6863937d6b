//! Permit domain tunables.

use serde::{Deserialize, Serialize};

/// Tunable bounds and budgets for the sticker lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermitConfig {
    /// Minimum activation duration in months.
    #[serde(default = "default_min_duration")]
    pub min_duration_months: u32,
    /// Maximum activation duration in months.
    #[serde(default = "default_max_duration")]
    pub max_duration_months: u32,
    /// Minimum stickers per generated batch.
    #[serde(default = "default_min_batch_quantity")]
    pub min_batch_quantity: i64,
    /// Maximum stickers per generated batch.
    #[serde(default = "default_max_batch_quantity")]
    pub max_batch_quantity: i64,
    /// Rounding tolerance for amount validation, in kobo.
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance_kobo: i64,
    /// Retry budget for code-generation collisions.
    #[serde(default = "default_code_retries")]
    pub code_retry_attempts: u32,
    /// Rows per bulk-insert chunk when generating stickers.
    #[serde(default = "default_insert_chunk")]
    pub insert_chunk_size: usize,
}

impl Default for PermitConfig {
    fn default() -> Self {
        Self {
            min_duration_months: default_min_duration(),
            max_duration_months: default_max_duration(),
            min_batch_quantity: default_min_batch_quantity(),
            max_batch_quantity: default_max_batch_quantity(),
            amount_tolerance_kobo: default_amount_tolerance(),
            code_retry_attempts: default_code_retries(),
            insert_chunk_size: default_insert_chunk(),
        }
    }
}

fn default_min_duration() -> u32 {
    1
}

fn default_max_duration() -> u32 {
    6
}

fn default_min_batch_quantity() -> i64 {
    10
}

fn default_max_batch_quantity() -> i64 {
    1_000_000
}

fn default_amount_tolerance() -> i64 {
    1
}

fn default_code_retries() -> u32 {
    3
}

fn default_insert_chunk() -> usize {
    1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_bounds() {
        let cfg = PermitConfig::default();
        assert_eq!(cfg.min_duration_months, 1);
        assert_eq!(cfg.max_duration_months, 6);
        assert_eq!(cfg.min_batch_quantity, 10);
        assert_eq!(cfg.max_batch_quantity, 1_000_000);
        assert_eq!(cfg.amount_tolerance_kobo, 1);
    }
}
