//! # Tax Decomposition
//!
//! Splits a tax-inclusive amount into its taxable base and tax.
//!
//! ## Residual Rounding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total = 8500.00 (includes 18% tax)                                    │
//! │                                                                         │
//! │  taxable = 8500.00 / 1.18 = 7203.3898... → 7203.39   (round half up)   │
//! │  tax     = 8500.00 - 7203.39            =  1296.61   (residual)        │
//! │                                                                         │
//! │  Only ONE value is rounded. Rounding both would give                   │
//! │    7203.39 + 1296.61 here, but 0.01 off on other inputs.               │
//! │  The residual guarantees taxable + tax == total on every line.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{div_round_half_up, Money};
use crate::types::Percent;
use crate::validation::{validate_tax_percentage, ValidationResult};

/// Taxable base and tax of a tax-inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxSplit {
    pub taxable: Money,
    pub tax: Money,
}

impl TaxSplit {
    /// The tax-inclusive amount this split came from.
    #[inline]
    pub fn total(&self) -> Money {
        self.taxable + self.tax
    }
}

/// Decomposes a tax-inclusive `total` at `tax_percentage`.
///
/// ## Rules
/// - 0%: `taxable = total`, `tax = 0`
/// - otherwise: `taxable = round_half_up(total × 10000 / (10000 + bps))`,
///   `tax = total - taxable`
///
/// ## Example
/// ```rust
/// use purchase_core::tax::decompose;
/// use purchase_core::{Money, Percent};
///
/// let split = decompose(Money::from_cents(850000), Percent::from_bps(1800)).unwrap();
/// assert_eq!(split.taxable, Money::from_cents(720339)); // 7203.39
/// assert_eq!(split.tax, Money::from_cents(129661));     // 1296.61
/// ```
pub fn decompose(total: Money, tax_percentage: Percent) -> ValidationResult<TaxSplit> {
    validate_tax_percentage(tax_percentage)?;

    if tax_percentage.is_zero() {
        return Ok(TaxSplit {
            taxable: total,
            tax: Money::zero(),
        });
    }

    let scale = Percent::ONE_HUNDRED.bps() as i128;
    let taxable = div_round_half_up(
        total.cents() as i128 * scale,
        scale + tax_percentage.bps() as i128,
    );
    // |taxable| <= |total| because the divisor exceeds the scale
    let taxable = Money::from_cents(taxable as i64);
    let tax = total
        .checked_sub(taxable)
        .ok_or_else(|| ValidationError::overflow("tax"))?;

    Ok(TaxSplit { taxable, tax })
}

// =============================================================================
// Unit Tests
// =============================================================================
