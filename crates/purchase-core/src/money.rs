//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A spreadsheet cell says 7203.39. As an f64 that is                     │
//! │    7203.3900000000003274...                                             │
//! │                                                                         │
//! │  Summing a few hundred of those drifts away from the invoice total,    │
//! │  and taxable + tax stops matching the line amount.                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    "7203.39" is parsed straight to 720339 paise, never via a float     │
//! │    Every sum and residual is exact                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use purchase_core::money::Money;
//!
//! // Parse from the text an import row carries
//! let mrp: Money = "999.0".parse().unwrap();
//! assert_eq!(mrp.cents(), 99900);
//!
//! // Arithmetic operations
//! let doubled = mrp * 2;
//! assert_eq!(doubled, Money::from_cents(199800));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percent;

/// Number of minor units in one major unit (100 paise = 1 rupee).
pub const MINOR_UNITS: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise, cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values are representable so that validation
///   can *reject* them instead of failing to parse them
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ImportRow.mrp ──► resolve_rate ──► ResolvedLine.rate                   │
/// │                                          │                              │
/// │                                          ▼ × quantity                   │
/// │                                   ResolvedLine.total                    │
/// │                                          │                              │
/// │                              ┌───────────┴───────────┐                  │
/// │                              ▼                       ▼                  │
/// │                          taxable          +         tax                 │
/// │                                                                         │
/// │  AggregatedLine / PurchaseTotals are plain sums of the above            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::money::Money;
    ///
    /// let price = Money::from_cents(79920); // 799.20
    /// assert_eq!(price.cents(), 79920);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::money::Money;
    ///
    /// let price = Money::from_major_minor(850, 0);
    /// assert_eq!(price.cents(), 85000);
    ///
    /// let negative = Money::from_major_minor(-5, 50);
    /// assert_eq!(negative.cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_UNITS - minor)
        } else {
            Money(major * MINOR_UNITS + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_UNITS
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % MINOR_UNITS).abs()
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

    /// Adds two values, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts two values, returning `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::money::Money;
    ///
    /// let rate = Money::from_cents(85000);
    /// assert_eq!(rate.checked_mul_quantity(10), Some(Money::from_cents(850000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Returns `pct` of this amount, rounded half-up to the minor unit.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`,
    /// widened to i128 so large amounts cannot overflow mid-calculation.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::money::Money;
    /// use purchase_core::types::Percent;
    ///
    /// let mrp = Money::from_cents(99900);              // 999.00
    /// let discount = mrp.percentage_of(Percent::from_bps(2000)); // 20%
    /// assert_eq!(discount.cents(), 19980);             // 199.80
    /// ```
    pub fn percentage_of(&self, pct: Percent) -> Money {
        let scaled = div_round_half_up(
            self.0 as i128 * pct.bps() as i128,
            Percent::ONE_HUNDRED.bps() as i128,
        );
        Money(scaled as i64)
    }
}

/// Integer division rounding half away from zero.
///
/// `denominator` must be positive. Used everywhere the engine rounds to the
/// minor unit so that rounding is identical across modules.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    if numerator >= 0 {
        (2 * numerator + denominator) / (2 * denominator)
    } else {
        -((-2 * numerator + denominator) / (2 * denominator))
    }
}

/// Parses fixed-point decimal text into an integer scaled by `10^scale`.
///
/// Accepts an optional sign, digits, and an optional fractional part.
/// Fraction digits beyond `scale` are only accepted when they are zeros,
/// so `"799.20"` and `"799.2000"` parse but `"799.205"` does not.
pub(crate) fn parse_scaled(text: &str, scale: u32) -> Result<i64, String> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err("expected a number".to_string());
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("'{}' is not a decimal number", text));
    }

    let scale = scale as usize;
    if frac_part.len() > scale && frac_part[scale..].chars().any(|c| c != '0') {
        return Err(format!("at most {} decimal places are allowed", scale));
    }

    let mut frac = frac_part.chars().take(scale).collect::<String>();
    while frac.len() < scale {
        frac.push('0');
    }

    let combined = format!("{}{}", if int_part.is_empty() { "0" } else { int_part }, frac);
    let value: i64 = combined
        .parse()
        .map_err(|_| format!("'{}' is too large", text))?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`799.20`, `-5.50`).
///
/// ## Note
/// No currency symbol; presentation belongs to whatever renders the document.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Parses decimal text such as `"999.0"` or `"1296.61"`.
///
/// ## Example
/// ```rust
/// use purchase_core::money::Money;
///
/// assert_eq!("850".parse::<Money>().unwrap().cents(), 85000);
/// assert_eq!("7203.39".parse::<Money>().unwrap().cents(), 720339);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 2)
            .map(Money)
            .map_err(|reason| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason,
            })
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (quantity).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
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
        let money = Money::from_cents(79920);
        assert_eq!(money.cents(), 79920);
        assert_eq!(money.major(), 799);
        assert_eq!(money.minor(), 20);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(999, 0).cents(), 99900);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(720339).to_string(), "7203.39");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("999.0".parse::<Money>().unwrap().cents(), 99900);
        assert_eq!("799.2".parse::<Money>().unwrap().cents(), 79920);
        assert_eq!("0.05".parse::<Money>().unwrap().cents(), 5);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(" 149 ".parse::<Money>().unwrap().cents(), 14900);
        assert_eq!("-50".parse::<Money>().unwrap().cents(), -5000);
        assert_eq!("850.0000".parse::<Money>().unwrap().cents(), 85000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1,299.00".parse::<Money>().is_err());
        assert!("12.345".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_checked_arithmetic_detects_overflow() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(max.checked_mul_quantity(2), None);
        assert_eq!(
            Money::from_cents(100).checked_sub(Money::from_cents(30)),
            Some(Money::from_cents(70))
        );
    }

    #[test]
    fn test_percentage_of_rounds_half_up() {
        // 20% of 999.00 = 199.80 exactly
        let mrp = Money::from_cents(99900);
        assert_eq!(mrp.percentage_of(Percent::from_bps(2000)).cents(), 19980);

        // 12.5% of 0.99 = 0.12375 → 0.12
        assert_eq!(Money::from_cents(99).percentage_of(Percent::from_bps(1250)).cents(), 12);

        // 50% of 0.05 = 0.025 → 0.03 (half rounds up)
        assert_eq!(Money::from_cents(5).percentage_of(Percent::from_bps(5000)).cents(), 3);
    }

    #[test]
    fn test_div_round_half_up() {
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(4, 3), 1);
        assert_eq!(div_round_half_up(-5, 2), -3);
        assert_eq!(div_round_half_up(8_500_000_000, 11_800), 720_339);
    }
}
