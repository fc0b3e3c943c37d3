//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Catalog prices are whole yen, tax is a basis-point fraction:           │
//! │    ¥349 × 10% = ¥34.9  → the storefront floors to ¥34, per line        │
//! │                                                                         │
//! │  OUR SOLUTION: i64 currency units + explicit, named rounding            │
//! │    Every truncation happens in exactly one function (floor_tax),       │
//! │    so cart, checkout and quick-order can never disagree.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use procura_core::money::Money;
//!
//! let price = Money::new(349); // ¥349
//!
//! // Arithmetic operations
//! let doubled = price * 2;              // ¥698
//! let total = price + Money::new(550);  // ¥899
//!
//! // NEVER do this:
//! // let bad = Money::from_float(3.49); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole currency units (yen).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type:
/// catalog list prices, company override prices, cart line totals,
/// tax amounts, shipping fees and order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    ///
    /// let price = Money::new(1280);
    /// assert_eq!(price.amount(), 1280);
    /// ```
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, truncating toward zero.
    ///
    /// ## Truncation Is Load-Bearing
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  PER-LINE FLOOR, NEVER FLOOR-OF-SUM                                 │
    /// │                                                                     │
    /// │  Line A: ¥349  × 10% = ¥34.9  → ¥34   (floored here)               │
    /// │  Line B: ¥1280 × 10% = ¥128.0 → ¥128                                │
    /// │                                                                     │
    /// │  tax = Σ floor(unit_price × rate) × quantity                        │
    /// │                                                                     │
    /// │  Flooring the aggregate instead would produce different totals      │
    /// │  whenever a line leaves a fractional remainder. Order history       │
    /// │  reconciliation depends on the per-line rule.                       │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    /// use procura_core::types::TaxRate;
    ///
    /// let price = Money::new(349);
    /// let rate = TaxRate::from_bps(1000); // 10%
    ///
    /// assert_eq!(price.floor_tax(rate).amount(), 34); // 34.9 → 34
    /// ```
    pub fn floor_tax(&self, rate: TaxRate) -> Money {
        // i128 to prevent overflow on large amounts
        // rate.bps() is basis points: 1000 = 10.00%
        let tax = (self.0 as i128 * rate.bps() as i128) / 10000;
        Money(tax as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use procura_core::money::Money;
    ///
    /// let unit_price = Money::new(349);
    /// assert_eq!(unit_price.multiply_quantity(10).amount(), 3490);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. UI formatting (thousands separators,
/// locale) belongs to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-¥{}", -self.0)
        } else {
            write!(f, "¥{}", self.0)
        }
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over iterators of Money (cart subtotals).
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
    fn test_new_and_amount() {
        let money = Money::new(1280);
        assert_eq!(money.amount(), 1280);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(1099)), "¥1099");
        assert_eq!(format!("{}", Money::new(0)), "¥0");
        assert_eq!(format!("{}", Money::new(-550)), "-¥550");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(550);

        assert_eq!((a + b).amount(), 1550);
        assert_eq!((a - b).amount(), 450);
        assert_eq!((a * 3).amount(), 3000);
    }

    #[test]
    fn test_floor_tax_truncates() {
        // ¥349 at 10% = ¥34.9 → ¥34, never ¥35
        let amount = Money::new(349);
        let rate = TaxRate::from_bps(1000);
        assert_eq!(amount.floor_tax(rate).amount(), 34);
    }

    #[test]
    fn test_floor_tax_exact() {
        // ¥1280 at 10% = ¥128 exactly
        let amount = Money::new(1280);
        let rate = TaxRate::from_bps(1000);
        assert_eq!(amount.floor_tax(rate).amount(), 128);
    }

    #[test]
    fn test_floor_tax_zero_rate() {
        let amount = Money::new(999);
        assert_eq!(amount.floor_tax(TaxRate::zero()).amount(), 0);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::new(100), Money::new(250), Money::new(5)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), 355);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::new(100).is_positive());
        assert!(Money::new(-100).is_negative());
    }

    /// Documents why the per-line rule matters: flooring the sum gives a
    /// different answer whenever lines carry fractional remainders.
    #[test]
    fn test_per_line_floor_differs_from_sum_floor() {
        let rate = TaxRate::from_bps(1000);

        // Two lines of ¥349: per-line floor → 34 + 34 = 68
        let per_line = Money::new(349).floor_tax(rate) + Money::new(349).floor_tax(rate);
        assert_eq!(per_line.amount(), 68);

        // Sum first (¥698), floor once → 69
        let sum_first = Money::new(698).floor_tax(rate);
        assert_eq!(sum_first.amount(), 69);

        assert_ne!(per_line, sum_first);
    }
}
