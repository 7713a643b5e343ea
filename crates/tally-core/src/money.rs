//! # Money Module
//!
//! Provides the `Money` type for monetary values in the ledger.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FIXED-WIDTH VALUE FIELD                                            │
//! │                                                                         │
//! │  The upload format stores amounts as cents with no decimal point:       │
//! │    "0000001275"  →  1275 cents  →  12.75                                │
//! │                                                                         │
//! │  Keeping cents as i64 end to end means seller totals are exact:        │
//! │    12.75 - 15.00 = -2.25  (never -2.2499999999999996)                  │
//! │                                                                         │
//! │  Only the HTTP layer converts to major units for JSON output.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let sale = Money::from_cents(1275);
//! let commission = Money::from_cents(1500);
//!
//! let net: Money = [sale, -commission].into_iter().sum();
//! assert_eq!(net.cents(), -225);
//! assert_eq!(net.to_string(), "-2.25");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg};

/// Number of cents in one major unit.
pub const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: commissions paid push a seller total below zero
/// - **Saturating arithmetic**: totals are defined for every input, an
///   absurdly large upload pins at `i64::MAX` instead of panicking
/// - **Serde as cents**: storage and tests see the exact integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let value = Money::from_cents(1275);
    /// assert_eq!(value.cents(), 1275);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion, truncated toward zero.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
    }

    /// Returns the value in major units as a float.
    ///
    /// Only meant for presentation (JSON bodies). Never feed the result back
    /// into arithmetic.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-225).to_major_units(), -2.25);
    /// ```
    #[inline]
    pub fn to_major_units(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as a plain decimal amount (`12.75`, `-2.25`), no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1275);
        assert_eq!(money.cents(), 1275);
        assert_eq!(money.units(), 12);
        assert_eq!(money.cents_part(), 75);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1275).to_string(), "12.75");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-225).to_string(), "-2.25");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let sale = Money::from_cents(1275);
        let commission = Money::from_cents(1500);
        assert_eq!((sale + -commission).cents(), -225);
        assert_eq!((sale + commission).cents(), 2775);
        assert_eq!((-sale).cents(), -1275);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);

        let min = Money::from_cents(i64::MIN);
        assert_eq!((-min).cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, -50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 300);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_major_units() {
        assert_eq!(Money::from_cents(1275).to_major_units(), 12.75);
        assert_eq!(Money::zero().to_major_units(), 0.0);
        assert_eq!(Money::from_cents(-225).to_major_units(), -2.25);
    }
}
