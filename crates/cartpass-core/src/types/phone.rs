//! Nigerian mobile phone number validation and normalization.
//!
//! Beneficiary phone numbers are optional, but when supplied they act as a
//! natural dedup key, so they are normalized to a single canonical form
//! (`+234XXXXXXXXXX`) before storage.

/// Normalize a raw phone input to canonical `+234XXXXXXXXXX` form.
///
/// Accepts `+234` / `234` / leading-`0` variants with optional spaces and
/// hyphens. Returns `None` when the input is not a valid Nigerian mobile
/// number (10 significant digits starting with 7, 8, or 9).
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')')
        .collect();

    let digits = if let Some(rest) = cleaned.strip_prefix("+234") {
        rest.to_string()
    } else if let Some(rest) = cleaned.strip_prefix("234") {
        rest.to_string()
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        rest.to_string()
    } else {
        return None;
    };

    if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !matches!(digits.chars().next(), Some('7' | '8' | '9')) {
        return None;
    }

    Some(format!("+234{digits}"))
}

/// Whether the input is a valid Nigerian mobile number in any accepted form.
pub fn is_valid_phone(raw: &str) -> bool {
    normalize_phone(raw).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_forms() {
        assert_eq!(
            normalize_phone("08031234567").as_deref(),
            Some("+2348031234567")
        );
        assert_eq!(
            normalize_phone("+234 803 123 4567").as_deref(),
            Some("+2348031234567")
        );
        assert_eq!(
            normalize_phone("2349051234567").as_deref(),
            Some("+2349051234567")
        );
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("0123456789"));
        assert!(!is_valid_phone("080312345678"));
        assert!(!is_valid_phone("not-a-phone"));
    }
}
