//! # Pricing Module
//!
//! Rate resolution and line totals.
//!
//! ## Discount Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A sheet row may fill any combination of the three discount columns.   │
//! │  The first one present wins; the rest are ignored.                     │
//! │                                                                         │
//! │   rate column?  ──yes──► ExplicitRate(rate)       rate = rate          │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │   discount amount? ─yes─► Amount(a)               rate = mrp - a       │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │   discount %? ──yes──►   Percentage(p)            rate = mrp - mrp×p   │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │   NoDiscount                                      rate = mrp           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Precedence is applied exactly once, in [`DiscountSpec::from_inputs`].
//! After that, [`resolve_rate`] is a plain match with no field probing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ImportRow, Percent};
use crate::validation::{
    validate_discount_amount, validate_discount_percentage, validate_explicit_rate,
    validate_mrp, validate_quantity, validate_resolved_rate, ValidationResult,
};

// =============================================================================
// Discount Specification
// =============================================================================

/// How the per-unit rate of a row is derived from its MRP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiscountSpec {
    /// Sold at MRP.
    #[default]
    NoDiscount,
    /// Flat amount off MRP.
    Amount(Money),
    /// Percentage off MRP.
    Percentage(Percent),
    /// Rate given directly; MRP is ignored.
    ExplicitRate(Money),
}

impl DiscountSpec {
    /// Picks the winning input: explicit rate, then amount, then percentage.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::pricing::DiscountSpec;
    /// use purchase_core::{Money, Percent};
    ///
    /// let spec = DiscountSpec::from_inputs(
    ///     Some(Money::from_cents(85000)),
    ///     None,
    ///     Some(Percent::from_bps(2000)),
    /// );
    /// assert_eq!(spec, DiscountSpec::ExplicitRate(Money::from_cents(85000)));
    /// ```
    pub fn from_inputs(
        explicit_rate: Option<Money>,
        discount_amount: Option<Money>,
        discount_percentage: Option<Percent>,
    ) -> Self {
        match (explicit_rate, discount_amount, discount_percentage) {
            (Some(rate), _, _) => DiscountSpec::ExplicitRate(rate),
            (None, Some(amount), _) => DiscountSpec::Amount(amount),
            (None, None, Some(pct)) => DiscountSpec::Percentage(pct),
            (None, None, None) => DiscountSpec::NoDiscount,
        }
    }

    /// Builds the discount from the optional columns of an import row.
    pub fn from_row(row: &ImportRow) -> Self {
        DiscountSpec::from_inputs(row.rate, row.discount_amount, row.discount_percentage)
    }
}

// =============================================================================
// Rate Resolution
// =============================================================================

/// Resolves the effective per-unit rate.
///
/// ## Errors
/// `mrp < 0`, an out-of-domain discount input, or a negative result
/// (e.g. a discount amount larger than MRP). The rate is never clamped.
///
/// ## Example
/// ```rust
/// use purchase_core::pricing::{resolve_rate, DiscountSpec};
/// use purchase_core::{Money, Percent};
///
/// let mrp = Money::from_cents(99900);
///
/// let rate = resolve_rate(mrp, &DiscountSpec::Percentage(Percent::from_bps(2000))).unwrap();
/// assert_eq!(rate, Money::from_cents(79920)); // 799.20
///
/// let rate = resolve_rate(mrp, &DiscountSpec::Amount(Money::from_cents(14900))).unwrap();
/// assert_eq!(rate, Money::from_cents(85000)); // 850.00
/// ```
pub fn resolve_rate(mrp: Money, discount: &DiscountSpec) -> ValidationResult<Money> {
    validate_mrp(mrp)?;

    let rate = match *discount {
        DiscountSpec::ExplicitRate(rate) => {
            validate_explicit_rate(rate)?;
            rate
        }
        DiscountSpec::Amount(amount) => {
            validate_discount_amount(amount)?;
            mrp.checked_sub(amount)
                .ok_or_else(|| ValidationError::overflow("rate"))?
        }
        DiscountSpec::Percentage(pct) => {
            validate_discount_percentage(pct)?;
            mrp - mrp.percentage_of(pct)
        }
        DiscountSpec::NoDiscount => mrp,
    };

    validate_resolved_rate(rate)?;
    Ok(rate)
}

// =============================================================================
// Line Total
// =============================================================================

/// Computes the tax-inclusive line total, `rate × quantity`.
///
/// ## Example
/// ```rust
/// use purchase_core::pricing::line_total;
/// use purchase_core::Money;
///
/// let total = line_total(Money::from_cents(85000), 10).unwrap();
/// assert_eq!(total, Money::from_cents(850000)); // 8500.00
///
/// assert!(line_total(Money::from_cents(85000), 0).is_err());
/// ```
pub fn line_total(rate: Money, quantity: i64) -> ValidationResult<Money> {
    validate_quantity(quantity)?;

    rate.checked_mul_quantity(quantity)
        .ok_or_else(|| ValidationError::overflow("total"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MRP: Money = Money::from_cents(99900);

    #[test]
    fn test_precedence_explicit_rate_wins() {
        let spec = DiscountSpec::from_inputs(
            Some(Money::from_cents(85000)),
            Some(Money::from_cents(14900)),
            Some(Percent::from_bps(2000)),
        );
        assert_eq!(spec, DiscountSpec::ExplicitRate(Money::from_cents(85000)));
    }

    #[test]
    fn test_precedence_amount_beats_percentage() {
        let spec = DiscountSpec::from_inputs(
            None,
            Some(Money::from_cents(14900)),
            Some(Percent::from_bps(2000)),
        );
        assert_eq!(spec, DiscountSpec::Amount(Money::from_cents(14900)));
    }

    #[test]
    fn test_precedence_fallbacks() {
        assert_eq!(
            DiscountSpec::from_inputs(None, None, Some(Percent::from_bps(500))),
            DiscountSpec::Percentage(Percent::from_bps(500))
        );
        assert_eq!(
            DiscountSpec::from_inputs(None, None, None),
            DiscountSpec::NoDiscount
        );
    }

    #[test]
    fn test_from_row() {
        let row = ImportRow::new("A", MRP, 1)
            .with_discount_percentage(Percent::from_bps(2000))
            .with_rate(Money::from_cents(85000));
        assert_eq!(
            DiscountSpec::from_row(&row),
            DiscountSpec::ExplicitRate(Money::from_cents(85000))
        );
    }

    #[test]
    fn test_resolve_percentage() {
        let rate = resolve_rate(MRP, &DiscountSpec::Percentage(Percent::from_bps(2000))).unwrap();
        assert_eq!(rate.cents(), 79920);
    }

    #[test]
    fn test_percentage_discount_rounds_before_subtracting() {
        // 999.00 at 12.5% off is exactly 874.125. The discount 124.875 rounds
        // up to 124.88, so the rate lands on 874.12.
        let spec = DiscountSpec::Percentage(Percent::from_bps(1250));
        let rate = resolve_rate(MRP, &spec).unwrap();
        assert_eq!(rate.cents(), 87412);
        assert_eq!(MRP.percentage_of(Percent::from_bps(1250)).cents(), 12488);
    }

    #[test]
    fn test_default_is_no_discount() {
        assert_eq!(DiscountSpec::default(), DiscountSpec::NoDiscount);
    }

    #[test]
    fn test_resolve_amount() {
        let rate = resolve_rate(MRP, &DiscountSpec::Amount(Money::from_cents(14900))).unwrap();
        assert_eq!(rate.cents(), 85000);
    }

    #[test]
    fn test_resolve_explicit_rate_used_verbatim() {
        // Above MRP is allowed: the rate is not clamped against MRP
        let spec = DiscountSpec::ExplicitRate(Money::from_cents(120000));
        let rate = resolve_rate(MRP, &spec).unwrap();
        assert_eq!(rate.cents(), 120000);
    }

    #[test]
    fn test_resolve_no_discount() {
        assert_eq!(resolve_rate(MRP, &DiscountSpec::NoDiscount).unwrap(), MRP);
    }

    #[test]
    fn test_full_percentage_discount_gives_zero_rate() {
        let rate = resolve_rate(MRP, &DiscountSpec::Percentage(Percent::ONE_HUNDRED)).unwrap();
        assert!(rate.is_zero());
    }

    #[test]
    fn test_discount_amount_above_mrp_is_rejected() {
        let err = resolve_rate(
            Money::from_cents(50000),
            &DiscountSpec::Amount(Money::from_cents(65000)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Negative {
                field: "rate".to_string()
            }
        );
    }

    #[test]
    fn test_negative_mrp_is_rejected() {
        let err = resolve_rate(Money::from_cents(-1), &DiscountSpec::NoDiscount).unwrap_err();
        assert_eq!(err.field(), "mrp");
    }

    #[test]
    fn test_out_of_range_percentage_is_rejected() {
        let spec = DiscountSpec::Percentage(Percent::from_bps(10050));
        let err = resolve_rate(MRP, &spec).unwrap_err();
        assert_eq!(err.field(), "discount_percentage");
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Money::from_cents(45000), 2).unwrap().cents(), 90000);
        assert_eq!(line_total(Money::zero(), 3).unwrap(), Money::zero());
    }

    #[test]
    fn test_line_total_rejects_bad_quantity() {
        assert_eq!(
            line_total(Money::from_cents(100), 0).unwrap_err().field(),
            "quantity"
        );
        assert!(line_total(Money::from_cents(100), -4).is_err());
    }

    #[test]
    fn test_line_total_overflow() {
        let err = line_total(Money::from_cents(i64::MAX / 2), 3).unwrap_err();
        assert_eq!(err, ValidationError::overflow("total"));
    }
}
