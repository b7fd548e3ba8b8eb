//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ONE CURRENCY, TWO SCALES                                               │
//! │                                                                         │
//! │  Storefront prices are quoted in WHOLE currency units (₹ 4462)          │
//! │  The payment widget expects MINOR units (446200 paise)                 │
//! │                                                                         │
//! │  Money stores minor units as i64 so both views are exact:              │
//! │    Money::from_major(4462).minor_units() == 446200                     │
//! │    Money::from_minor(446200).major()     == 4462                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use innoprint_core::money::Money;
//!
//! let price = Money::from_major(800);
//! let doubled = price * 2;
//! let total = doubled + Money::from_major(100);
//! assert_eq!(total.major(), 1700);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Minor units per major unit (paise per rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// PricingResult.total ──► CheckoutSummary.subtotal ──► + shipping + tax
///        │
///        └──────────────► PaymentRequest.amount (minor units)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (paise).
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole currency units, saturating at the
    /// `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use innoprint_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(12).minor_units(), 1200);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Creates a Money value from major and minor parts.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(MINOR_PER_MAJOR).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(MINOR_PER_MAJOR).saturating_add(minor))
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at minor-unit precision, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use innoprint_core::money::Money;
    /// use innoprint_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_major(4462);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1800)); // 18% GST
    /// assert_eq!(tax.minor_units(), 80316); // ₹803.16
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Rounds to the nearest whole currency unit (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use innoprint_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(80316).round_to_major().major(), 803);
    /// assert_eq!(Money::from_minor(80350).round_to_major().major(), 804);
    /// ```
    pub fn round_to_major(&self) -> Money {
        let half = MINOR_PER_MAJOR / 2;
        let rounded = if self.0 >= 0 {
            self.0.saturating_add(half) / MINOR_PER_MAJOR
        } else {
            self.0.saturating_sub(half) / MINOR_PER_MAJOR
        };
        Money::from_major(rounded)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates. A quote is never allowed to wrap into a negative
// amount.

/// For logs and the CLI. The storefront formats with its own locale rules.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a copy count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_and_minor_views() {
        let money = Money::from_minor(109_950);
        assert_eq!(money.major(), 1099);
        assert_eq!(money.minor_part(), 50);
        assert_eq!(Money::from_major(4462).minor_units(), 446_200);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).minor_units(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).minor_units(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_major(800).to_string(), "800.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);

        assert_eq!((a + b).major(), 15);
        assert_eq!((a - b).major(), 5);
        assert_eq!((a * 3).major(), 30);

        let mut c = a;
        c += b;
        assert_eq!(c.major(), 15);
    }

    #[test]
    fn test_gst_on_whole_rupees() {
        let tax = Money::from_major(800).calculate_tax(TaxRate::from_bps(1800));
        assert_eq!(tax.minor_units(), 14_400);
        assert_eq!(tax.round_to_major().major(), 144);
    }

    #[test]
    fn test_arithmetic_saturates() {
        assert_eq!(Money::from_major(i64::MAX / 10).minor_units(), i64::MAX);
        assert_eq!(Money::from_major(i64::MIN / 10).minor_units(), i64::MIN);

        let max = Money::from_minor(i64::MAX);
        assert_eq!((max + Money::from_major(100)).minor_units(), i64::MAX);
        assert_eq!((max * 3).minor_units(), i64::MAX);
        assert_eq!((Money::from_minor(i64::MIN) - Money::from_major(1)).minor_units(), i64::MIN);
        assert!(!max.round_to_major().is_negative());
        assert!(!max.calculate_tax(TaxRate::from_bps(10_000)).is_negative());
    }

    #[test]
    fn test_round_to_major_half_cases() {
        assert_eq!(Money::from_minor(149).round_to_major().major(), 1);
        assert_eq!(Money::from_minor(150).round_to_major().major(), 2);
        assert_eq!(Money::from_minor(-150).round_to_major().major(), -2);
        assert_eq!(Money::from_minor(0).round_to_major(), Money::zero());
    }
}
