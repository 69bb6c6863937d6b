//! Monetary amounts in kobo (Nigerian minor currency unit).
//!
//! Kobo is the canonical representation end-to-end: every stored price,
//! computed total, and comparison happens in kobo. Conversion from Naira
//! happens exactly once, at the API boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An amount of money in kobo (1 Naira = 100 kobo).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Kobo(pub i64);

impl Kobo {
    /// Zero kobo.
    pub const ZERO: Self = Self(0);

    /// Convert a whole-Naira amount to kobo.
    pub const fn from_naira(naira: i64) -> Self {
        Self(naira * 100)
    }

    /// The raw kobo value.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Multiply a unit price by a duration, saturating on overflow.
    pub const fn times(self, factor: i64) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// Whether `other` is within `tolerance` kobo of this amount.
    pub const fn within_tolerance(self, other: Self, tolerance: i64) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl fmt::Display for Kobo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let naira = self.0 / 100;
        let kobo = (self.0 % 100).abs();
        write!(f, "NGN {naira}.{kobo:02}")
    }
}

impl From<i64> for Kobo {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
