//! Sticker and batch code generation.
//!
//! Sticker codes compose the LGA prefix with an epoch-millisecond
//! timestamp, a 2-digit random component, and a 3-digit per-batch
//! sequence. The composite avoids any cross-request coordination while
//! keeping the collision probability negligible for realistic batch
//! sizes; the trade-off is that codes are not strictly sortable. The
//! storage-level unique constraint remains the final backstop.

use chrono::Utc;
use rand::Rng;

/// Shortest accepted LGA prefix.
const MIN_PREFIX_LEN: usize = 2;
/// Longest accepted LGA prefix.
const MAX_PREFIX_LEN: usize = 10;
/// Numeric suffix length bounds (epoch millis + random + sequence).
const MIN_SUFFIX_LEN: usize = 13;
const MAX_SUFFIX_LEN: usize = 20;

/// Generate one sticker code: `{LGA}-{epoch_ms}{RR}{SSS}`.
///
/// The sequence is the full per-batch position zero-padded to 3 digits
/// (it grows wider for large batches), so two codes of one batch can
/// never collide no matter how fast they are generated within a single
/// millisecond. The QR payload is defined as identical to the code —
/// scanning clients resolve it via a lookup call, not an embedded URL.
pub fn sticker_code(lga_code: &str, sequence: u32) -> String {
    let millis = Utc::now().timestamp_millis();
    let salt: u32 = rand::rng().random_range(0..100);
    format!("{lga_code}-{millis}{salt:02}{sequence:03}")
}

/// Validate a sticker code and recover its LGA prefix.
///
/// Accepts `^[A-Z]{2,10}-\d{13,20}$`: an uppercase prefix, one hyphen,
/// and a 13–20 digit suffix.
pub fn parse_sticker_code(code: &str) -> Option<(&str, &str)> {
    let (prefix, suffix) = code.split_once('-')?;

    let prefix_ok = (MIN_PREFIX_LEN..=MAX_PREFIX_LEN).contains(&prefix.len())
        && prefix.chars().all(|c| c.is_ascii_uppercase());
    let suffix_ok = (MIN_SUFFIX_LEN..=MAX_SUFFIX_LEN).contains(&suffix.len())
        && suffix.chars().all(|c| c.is_ascii_digit())
        && !suffix.contains('-');

    (prefix_ok && suffix_ok).then_some((prefix, suffix))
}

/// Compute the next batch code for a year: `BATCH-{year}-{seq}`.
///
/// The sequence continues from the latest persisted code and resets when
/// the year rolls over. Callers insert under the unique constraint and
/// retry on conflict, so a stale `latest` only costs one extra round.
pub fn next_batch_code(year: i32, latest: Option<&str>) -> String {
    let next_seq = latest
        .and_then(|code| code.rsplit('-').next())
        .and_then(|seq| seq.parse::<u32>().ok())
        .map_or(1, |seq| seq + 1);

    format!("BATCH-{year}-{next_seq:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_codes_parse_back() {
        let code = sticker_code("IFO", 7);
        let (prefix, suffix) = parse_sticker_code(&code).expect("generated code must validate");
        assert_eq!(prefix, "IFO");
        assert!(suffix.ends_with("007"));
    }

    #[test]
    fn codes_within_a_batch_are_distinct() {
        let codes: HashSet<String> = (0..5_000).map(|i| sticker_code("ABEOKUTA", i)).collect();
        assert_eq!(codes.len(), 5_000);
    }

    #[test]
    fn sequence_widens_past_three_digits() {
        let code = sticker_code("IFO", 4_242);
        assert!(code.ends_with("4242"));
        assert!(parse_sticker_code(&code).is_some());
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(parse_sticker_code("IFO").is_none());
        assert!(parse_sticker_code("ifo-1754000000000420").is_none());
        assert!(parse_sticker_code("IFO-12345").is_none());
        assert!(parse_sticker_code("I-1754000000000420001").is_none());
        assert!(parse_sticker_code("IFO-1754000000000420-1").is_none());
    }

    #[test]
    fn batch_sequence_continues_and_resets() {
        assert_eq!(next_batch_code(2026, None), "BATCH-2026-001");
        assert_eq!(
            next_batch_code(2026, Some("BATCH-2026-041")),
            "BATCH-2026-042"
        );
        // Year rollover: the previous year's codes are not consulted.
        assert_eq!(next_batch_code(2027, None), "BATCH-2027-001");
    }

    #[test]
    fn batch_sequence_grows_past_three_digits() {
        assert_eq!(
            next_batch_code(2026, Some("BATCH-2026-999")),
            "BATCH-2026-1000"
        );
    }
}
