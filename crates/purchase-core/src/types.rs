//! # Domain Types
//!
//! Value types that flow through the purchase import pipeline.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Import Pipeline Types                           │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ImportRow     │   │  ResolvedLine   │   │ AggregatedLine  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  barcode        │──►│  rate           │──►│  Σ quantity     │       │
//! │  │  mrp            │   │  total          │   │  Σ total        │       │
//! │  │  discount inputs│   │  taxable + tax  │   │  Σ taxable/tax  │       │
//! │  │  tax_percentage │   │  position       │   │  merged_rows    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                       │                 │
//! │  ┌─────────────────┐                                  ▼                 │
//! │  │    Percent      │                          PurchaseTotals            │
//! │  │  bps (i64)      │                          (see `totals`)            │
//! │  │  1800 = 18%     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value here is created once and never changed afterwards; a
//! correction is a new value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{parse_scaled, Money};

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (a common GST slab), 1250 bps = 12.5%
///
/// Signed so that a negative spreadsheet value survives parsing and is
/// rejected by validation with a proper message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    /// 100%.
    pub const ONE_HUNDRED: Percent = Percent(10_000);

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the percentage is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        if abs % 100 == 0 {
            write!(f, "{}{}%", sign, abs / 100)
        } else {
            write!(f, "{}{}.{:02}%", sign, abs / 100, abs % 100)
        }
    }
}

/// Parses decimal text such as `"18"`, `"12.5"` or `"0.25"`.
///
/// ## Example
/// ```rust
/// use purchase_core::types::Percent;
///
/// assert_eq!("18".parse::<Percent>().unwrap().bps(), 1800);
/// assert_eq!("12.5".parse::<Percent>().unwrap().bps(), 1250);
/// assert!("18%".parse::<Percent>().is_err());
/// ```
impl FromStr for Percent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 2)
            .map(Percent)
            .map_err(|reason| ValidationError::InvalidFormat {
                field: "percentage".to_string(),
                reason,
            })
    }
}

// =============================================================================
// Import Row
// =============================================================================

/// One spreadsheet line as handed over by the row reader.
///
/// The three discount inputs may all be present at once; which one wins is
/// decided by [`DiscountSpec::from_row`](crate::pricing::DiscountSpec::from_row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportRow {
    /// Product barcode (EAN-13, UPC-A, or a store code).
    pub barcode: String,

    /// Product name as written in the sheet. May be empty.
    #[serde(default)]
    pub name: String,

    /// Maximum retail price, the pre-discount reference price.
    pub mrp: Money,

    /// Flat discount off MRP per unit.
    #[serde(default)]
    pub discount_amount: Option<Money>,

    /// Percentage discount off MRP.
    #[serde(default)]
    pub discount_percentage: Option<Percent>,

    /// Explicit per-unit purchase rate.
    #[serde(default)]
    pub rate: Option<Money>,

    /// Units purchased.
    pub quantity: i64,

    /// HSN classification code.
    #[serde(default)]
    pub hsn: String,

    /// Tax percentage already included in the rate.
    #[serde(default)]
    pub tax_percentage: Percent,
}

impl ImportRow {
    /// Creates a row with no discount inputs and zero tax.
    pub fn new(barcode: impl Into<String>, mrp: Money, quantity: i64) -> Self {
        ImportRow {
            barcode: barcode.into(),
            name: String::new(),
            mrp,
            discount_amount: None,
            discount_percentage: None,
            rate: None,
            quantity,
            hsn: String::new(),
            tax_percentage: Percent::zero(),
        }
    }

    /// Sets the product name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the flat discount amount.
    pub fn with_discount_amount(mut self, amount: Money) -> Self {
        self.discount_amount = Some(amount);
        self
    }

    /// Sets the discount percentage.
    pub fn with_discount_percentage(mut self, pct: Percent) -> Self {
        self.discount_percentage = Some(pct);
        self
    }

    /// Sets an explicit purchase rate.
    pub fn with_rate(mut self, rate: Money) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the HSN code and tax percentage.
    pub fn with_tax(mut self, hsn: impl Into<String>, tax_percentage: Percent) -> Self {
        self.hsn = hsn.into();
        self.tax_percentage = tax_percentage;
        self
    }
}

// =============================================================================
// Resolved Line
// =============================================================================

/// A single import row after pricing and tax decomposition.
///
/// ## Invariant
/// `taxable + tax == total`, exactly, in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedLine {
    /// 1-based position of the source row in the batch.
    pub position: usize,
    pub barcode: String,
    pub name: String,
    pub hsn: String,
    pub mrp: Money,
    /// Per-unit rate after discount resolution.
    pub rate: Money,
    pub quantity: i64,
    pub tax_percentage: Percent,
    /// Tax-inclusive line total (rate × quantity).
    pub total: Money,
    pub taxable: Money,
    pub tax: Money,
}

impl ResolvedLine {
    /// Checks `taxable + tax == total`.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.taxable.checked_add(self.tax) == Some(self.total)
    }
}

// =============================================================================
// Aggregated Line
// =============================================================================

/// One purchase line item, possibly merged from several resolved lines.
///
/// Descriptive fields (barcode, name, HSN, rate, tax percentage) come from the
/// first row seen for the dedup key. Quantity and money fields are sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregatedLine {
    pub barcode: String,
    pub name: String,
    pub hsn: String,
    pub mrp: Money,
    pub rate: Money,
    pub quantity: i64,
    pub tax_percentage: Percent,
    pub total: Money,
    pub taxable: Money,
    pub tax: Money,
    /// Positions of every source row folded into this line, in input order.
    pub merged_rows: Vec<usize>,
}

impl AggregatedLine {
    /// Checks `taxable + tax == total`.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.taxable.checked_add(self.tax) == Some(self.total)
    }

    /// Returns true when more than one row was merged into this line.
    #[inline]
    pub fn is_merged(&self) -> bool {
        self.merged_rows.len() > 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_from_bps() {
        let pct = Percent::from_bps(1800);
        assert_eq!(pct.bps(), 1800);
        assert!(!pct.is_zero());
        assert!(!pct.is_negative());
    }

    #[test]
    fn test_percent_parse() {
        assert_eq!("0".parse::<Percent>().unwrap(), Percent::zero());
        assert_eq!("100".parse::<Percent>().unwrap(), Percent::ONE_HUNDRED);
        assert_eq!("-5".parse::<Percent>().unwrap().bps(), -500);
        assert!("".parse::<Percent>().is_err());
        assert!("eighteen".parse::<Percent>().is_err());
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::from_bps(1800).to_string(), "18%");
        assert_eq!(Percent::from_bps(1250).to_string(), "12.50%");
        assert_eq!(Percent::from_bps(-25).to_string(), "-0.25%");
    }

    #[test]
    fn test_import_row_builder() {
        let row = ImportRow::new("8901234567890", Money::from_cents(99900), 10)
            .with_name("Steel Bottle 1L")
            .with_discount_percentage(Percent::from_bps(2000))
            .with_tax("7323", Percent::from_bps(1800));

        assert_eq!(row.barcode, "8901234567890");
        assert_eq!(row.name, "Steel Bottle 1L");
        assert_eq!(row.discount_percentage, Some(Percent::from_bps(2000)));
        assert_eq!(row.discount_amount, None);
        assert_eq!(row.rate, None);
        assert_eq!(row.hsn, "7323");
        assert_eq!(row.tax_percentage.bps(), 1800);
    }

    #[test]
    fn test_import_row_deserialize_with_missing_optionals() {
        let json = r#"{"barcode":"ABC","mrp":50000,"quantity":2}"#;
        let row: ImportRow = serde_json::from_str(json).unwrap();
        assert_eq!(row, ImportRow::new("ABC", Money::from_cents(50000), 2));
    }
}
