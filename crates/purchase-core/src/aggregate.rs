//! # Item Aggregator
//!
//! Merges resolved lines that describe the same purchase line.
//!
//! ## Merge Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input (row order)              IndexMap<DedupKey, LineAccumulator>     │
//! │                                                                         │
//! │  #1  A  mrp 999  qty 5   ──►   (A, 999) ─► qty 5                        │
//! │  #2  B  mrp 120  qty 1   ──►   (A, 999) ─► qty 5                        │
//! │                                (B, 120) ─► qty 1                        │
//! │  #3  A  mrp 999  qty 10  ──►   (A, 999) ─► qty 15   rows [1, 3]         │
//! │                                (B, 120) ─► qty 1    rows [2]            │
//! │                                                                         │
//! │  output: [A ×15, B ×1]  first-appearance order, never sorted            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The map's insertion order is the output order, so stability does not
//! depend on hashing.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use crate::config::DedupKeyMode;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AggregatedLine, ResolvedLine};

// =============================================================================
// Dedup Key
// =============================================================================

/// Identity of a purchase line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub barcode: String,
    pub mrp: Money,
    /// Only set under [`DedupKeyMode::BarcodeMrpRate`].
    pub rate: Option<Money>,
}

impl DedupKeyMode {
    /// Builds the key for a line. Barcodes are compared trimmed.
    pub fn key_for(&self, line: &ResolvedLine) -> DedupKey {
        DedupKey {
            barcode: line.barcode.trim().to_string(),
            mrp: line.mrp,
            rate: match self {
                DedupKeyMode::BarcodeMrp => None,
                DedupKeyMode::BarcodeMrpRate => Some(line.rate),
            },
        }
    }
}

// =============================================================================
// Accumulator
// =============================================================================

/// Running aggregate for one key. Private: callers only see the finished
/// [`AggregatedLine`].
struct LineAccumulator {
    first: ResolvedLine,
    quantity: i64,
    total: Money,
    taxable: Money,
    tax: Money,
    rows: Vec<usize>,
}

impl LineAccumulator {
    fn start(line: ResolvedLine) -> Self {
        LineAccumulator {
            quantity: line.quantity,
            total: line.total,
            taxable: line.taxable,
            tax: line.tax,
            rows: vec![line.position],
            first: line,
        }
    }

    fn absorb(&mut self, line: &ResolvedLine) -> CoreResult<()> {
        let overflow = |field: &str| {
            CoreError::at_row(line.position, &line.barcode, ValidationError::overflow(field))
        };

        self.quantity = self
            .quantity
            .checked_add(line.quantity)
            .ok_or_else(|| overflow("quantity"))?;
        self.total = self.total.checked_add(line.total).ok_or_else(|| overflow("total"))?;
        self.taxable = self
            .taxable
            .checked_add(line.taxable)
            .ok_or_else(|| overflow("taxable"))?;
        self.tax = self.tax.checked_add(line.tax).ok_or_else(|| overflow("tax"))?;
        self.rows.push(line.position);
        Ok(())
    }

    fn finish(self) -> AggregatedLine {
        let first = self.first;
        AggregatedLine {
            barcode: first.barcode,
            name: first.name,
            hsn: first.hsn,
            mrp: first.mrp,
            rate: first.rate,
            quantity: self.quantity,
            tax_percentage: first.tax_percentage,
            total: self.total,
            taxable: self.taxable,
            tax: self.tax,
            merged_rows: self.rows,
        }
    }
}

// =============================================================================
// Aggregator
// =============================================================================

/// Folds resolved lines into aggregated lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemAggregator {
    mode: DedupKeyMode,
}

impl ItemAggregator {
    /// Creates an aggregator using the given dedup key.
    pub fn new(mode: DedupKeyMode) -> Self {
        ItemAggregator { mode }
    }

    /// Returns the dedup key mode.
    pub fn mode(&self) -> DedupKeyMode {
        self.mode
    }

    /// Merges lines sharing a dedup key, preserving first-appearance order.
    ///
    /// ## Errors
    /// Only arithmetic overflow while summing, reported at the row that
    /// pushed the sum out of range.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::aggregate::ItemAggregator;
    /// use purchase_core::engine::ImportEngine;
    /// use purchase_core::{ImportRow, Money};
    ///
    /// let engine = ImportEngine::default();
    /// let a = engine.resolve_row(1, &ImportRow::new("A", Money::from_cents(1000), 5)).unwrap();
    /// let b = engine.resolve_row(2, &ImportRow::new("A", Money::from_cents(1000), 10)).unwrap();
    ///
    /// let lines = ItemAggregator::default().aggregate(vec![a, b]).unwrap();
    /// assert_eq!(lines.len(), 1);
    /// assert_eq!(lines[0].quantity, 15);
    /// ```
    pub fn aggregate<I>(&self, lines: I) -> CoreResult<Vec<AggregatedLine>>
    where
        I: IntoIterator<Item = ResolvedLine>,
    {
        let mut groups: IndexMap<DedupKey, LineAccumulator> = IndexMap::new();

        for line in lines {
            match groups.entry(self.mode.key_for(&line)) {
                Entry::Occupied(mut entry) => {
                    debug!(
                        position = line.position,
                        barcode = %line.barcode,
                        first_position = entry.get().first.position,
                        "Merging duplicate import row"
                    );
                    entry.get_mut().absorb(&line)?;
                }
                Entry::Vacant(entry) => {
                    entry.insert(LineAccumulator::start(line));
                }
            }
        }

        Ok(groups.into_values().map(LineAccumulator::finish).collect())
    }
}

/// Aggregates with the default `(barcode, mrp)` key.
pub fn aggregate<I>(lines: I) -> CoreResult<Vec<AggregatedLine>>
where
    I: IntoIterator<Item = ResolvedLine>,
{
    ItemAggregator::default().aggregate(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================
