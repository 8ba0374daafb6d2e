//! # Purchase Totals
//!
//! Header-level totals of one import batch.
//!
//! Since every aggregated line satisfies `taxable + tax == total`, summing
//! field by field keeps `taxable + tax == amount` on the header with no
//! further rounding.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::AggregatedLine;

/// Totals written on the purchase document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseTotals {
    /// Number of aggregated lines.
    pub line_count: usize,
    pub quantity: i64,
    pub taxable: Money,
    pub tax: Money,
    /// Tax-inclusive amount.
    pub amount: Money,
}

impl PurchaseTotals {
    /// Sums quantity, taxable, tax and amount over `lines`.
    ///
    /// An empty slice gives all-zero totals. Fails only on arithmetic overflow.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::totals::PurchaseTotals;
    ///
    /// let totals = PurchaseTotals::accumulate(&[]).unwrap();
    /// assert_eq!(totals, PurchaseTotals::default());
    /// ```
    pub fn accumulate(lines: &[AggregatedLine]) -> CoreResult<Self> {
        lines.iter().try_fold(PurchaseTotals::default(), |acc, line| -> CoreResult<Self> {
            let overflow = |field: &str| CoreError::InvalidInput(ValidationError::overflow(field));

            Ok(PurchaseTotals {
                line_count: acc.line_count + 1,
                quantity: acc
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| overflow("total_quantity"))?,
                taxable: acc
                    .taxable
                    .checked_add(line.taxable)
                    .ok_or_else(|| overflow("total_taxable"))?,
                tax: acc
                    .tax
                    .checked_add(line.tax)
                    .ok_or_else(|| overflow("total_tax"))?,
                amount: acc
                    .amount
                    .checked_add(line.total)
                    .ok_or_else(|| overflow("total_amount"))?,
            })
        })
    }

    /// Like [`accumulate`](Self::accumulate), but an empty batch is an error.
    pub fn accumulate_non_empty(lines: &[AggregatedLine]) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptyBatch);
        }
        Self::accumulate(lines)
    }

    /// Checks `taxable + tax == amount`.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.taxable.checked_add(self.tax) == Some(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
