//! # Import Engine
//!
//! Runs one batch of import rows through the whole pipeline.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ImportEngine::process                           │
//! │                                                                         │
//! │  rows ──► resolve_row (per row, in order)                              │
//! │             │  validate_row                                             │
//! │             │  DiscountSpec::from_row ──► resolve_rate                 │
//! │             │  line_total                                               │
//! │             │  decompose                                                │
//! │             ▼                                                           │
//! │          ResolvedLine*  ──► ItemAggregator ──► AggregatedLine*         │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                             PurchaseTotals              │
//! │                                                                         │
//! │  First failure aborts the batch. Nothing partial is returned.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds only its configuration, so one instance can serve any
//! number of batches, from any number of threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::aggregate::ItemAggregator;
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pricing::{line_total, resolve_rate, DiscountSpec};
use crate::tax::decompose;
use crate::totals::PurchaseTotals;
use crate::types::{AggregatedLine, ImportRow, ResolvedLine};
use crate::validation::validate_row;

// =============================================================================
// Import Outcome
// =============================================================================

/// Everything the persistence layer needs to write one purchase document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportOutcome {
    /// Number of import rows consumed.
    pub rows_read: usize,
    /// Line items, in first-appearance order.
    pub lines: Vec<AggregatedLine>,
    /// Header totals over `lines`.
    pub totals: PurchaseTotals,
}

impl ImportOutcome {
    /// Checks the reconciliation invariants on every line and on the header.
    pub fn is_balanced(&self) -> bool {
        self.lines.iter().all(AggregatedLine::is_balanced) && self.totals.is_balanced()
    }
}

// =============================================================================
// Import Engine
// =============================================================================

/// Pricing, tax and dedup engine for purchase imports.
#[derive(Debug, Clone, Default)]
pub struct ImportEngine {
    config: EngineConfig,
}

impl ImportEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        ImportEngine { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Prices one row and splits its tax.
    ///
    /// `position` is the 1-based row number reported in errors.
    ///
    /// ## Example
    /// ```rust
    /// use purchase_core::engine::ImportEngine;
    /// use purchase_core::{ImportRow, Money, Percent};
    ///
    /// let row = ImportRow::new("8901234567890", Money::from_cents(99900), 10)
    ///     .with_discount_amount(Money::from_cents(14900))
    ///     .with_tax("7323", Percent::from_bps(1800));
    ///
    /// let line = ImportEngine::default().resolve_row(1, &row).unwrap();
    /// assert_eq!(line.rate, Money::from_cents(85000));
    /// assert_eq!(line.total, Money::from_cents(850000));
    /// assert_eq!(line.taxable, Money::from_cents(720339));
    /// assert_eq!(line.tax, Money::from_cents(129661));
    /// ```
    pub fn resolve_row(&self, position: usize, row: &ImportRow) -> CoreResult<ResolvedLine> {
        let at_row = |reason: ValidationError| CoreError::at_row(position, &row.barcode, reason);

        validate_row(row).map_err(at_row)?;

        let discount = DiscountSpec::from_row(row);
        let rate = resolve_rate(row.mrp, &discount).map_err(at_row)?;
        let total = line_total(rate, row.quantity).map_err(at_row)?;
        let split = decompose(total, row.tax_percentage).map_err(at_row)?;

        debug!(
            position,
            barcode = %row.barcode,
            ?discount,
            rate = %rate,
            quantity = row.quantity,
            total = %total,
            "Resolved import row"
        );

        Ok(ResolvedLine {
            position,
            barcode: row.barcode.trim().to_string(),
            name: row.name.trim().to_string(),
            hsn: row.hsn.trim().to_string(),
            mrp: row.mrp,
            rate,
            quantity: row.quantity,
            tax_percentage: row.tax_percentage,
            total,
            taxable: split.taxable,
            tax: split.tax,
        })
    }

    /// Processes a whole batch.
    ///
    /// ## Errors
    /// - `InvalidRow` for the first row that fails, with its position
    /// - `TooManyRows` when the batch exceeds `max_rows`
    /// - `EmptyBatch` for zero rows unless `allow_empty_batch` is set
    pub fn process<I>(&self, rows: I) -> CoreResult<ImportOutcome>
    where
        I: IntoIterator<Item = ImportRow>,
    {
        let mut rows = rows.into_iter();
        let mut resolved = Vec::new();

        while let Some(row) = rows.next() {
            let position = resolved.len() + 1;
            if position > self.config.max_rows {
                let found = position + rows.count();
                warn!(max = self.config.max_rows, found, "Import batch too large");
                return Err(CoreError::TooManyRows {
                    max: self.config.max_rows,
                    found,
                });
            }

            match self.resolve_row(position, &row) {
                Ok(line) => resolved.push(line),
                Err(err) => {
                    warn!(position, barcode = %row.barcode, error = %err, "Import row rejected");
                    return Err(err);
                }
            }
        }

        let rows_read = resolved.len();
        let lines = ItemAggregator::new(self.config.dedup_key).aggregate(resolved)?;

        let totals = if self.config.allow_empty_batch {
            PurchaseTotals::accumulate(&lines)?
        } else {
            PurchaseTotals::accumulate_non_empty(&lines)?
        };

        info!(
            rows = rows_read,
            lines = lines.len(),
            quantity = totals.quantity,
            taxable = %totals.taxable,
            tax = %totals.tax,
            amount = %totals.amount,
            "Processed import batch"
        );

        Ok(ImportOutcome {
            rows_read,
            lines,
            totals,
        })
    }

    /// Validates and prices every row without stopping at the first failure.
    ///
    /// Returns one error per rejected row, in row order. When every row
    /// prices cleanly, the merge and header sums are run as well, so an
    /// overflow there is reported too. Batch-size limits (`max_rows`, the
    /// empty-batch policy) are left to [`process`](Self::process). The
    /// caller decides whether to skip, abort, or ask the user.
    pub fn check<'a, I>(&self, rows: I) -> Vec<CoreError>
    where
        I: IntoIterator<Item = &'a ImportRow>,
    {
        let mut errors = Vec::new();
        let mut resolved = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            match self.resolve_row(index + 1, row) {
                Ok(line) => resolved.push(line),
                Err(err) => errors.push(err),
            }
        }

        if errors.is_empty() {
            let summed = ItemAggregator::new(self.config.dedup_key)
                .aggregate(resolved)
                .and_then(|lines| PurchaseTotals::accumulate(&lines));
            if let Err(err) = summed {
                errors.push(err);
            }
        }

        if !errors.is_empty() {
            warn!(rejected = errors.len(), "Import rows failed validation");
        }

        errors
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DedupKeyMode;
    use crate::error::ErrorKind;
    use crate::money::Money;
    use crate::types::Percent;

    fn row(barcode: &str, mrp: i64, qty: i64) -> ImportRow {
        ImportRow::new(barcode, Money::from_cents(mrp), qty)
    }

    #[test]
    fn test_resolve_row_trims_descriptive_fields() {
        let row = row(" A1 ", 1000, 1).with_name(" Soap ").with_tax(" 3401 ", Percent::zero());
        let line = ImportEngine::default().resolve_row(4, &row).unwrap();
        assert_eq!(line.position, 4);
        assert_eq!(line.barcode, "A1");
        assert_eq!(line.name, "Soap");
        assert_eq!(line.hsn, "3401");
    }

    #[test]
    fn test_resolve_row_error_carries_position() {
        let bad = row("B2", 50000, 1).with_discount_amount(Money::from_cents(65000));
        let err = ImportEngine::default().resolve_row(9, &bad).unwrap_err();

        assert_eq!(err.position(), Some(9));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(
            err,
            CoreError::InvalidRow { ref barcode, reason: ValidationError::Negative { .. }, .. }
                if barcode == "B2"
        ));
    }

    #[test]
    fn test_process_aborts_on_first_bad_row() {
        let rows = vec![row("A", 1000, 1), row("B", 1000, 0), row("C", -1, 1)];
        let err = ImportEngine::default().process(rows).unwrap_err();
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_process_empty_batch_policy() {
        let err = ImportEngine::default().process(Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyBatch);

        let engine = ImportEngine::new(EngineConfig {
            allow_empty_batch: true,
            ..EngineConfig::default()
        });
        let outcome = engine.process(Vec::new()).unwrap();
        assert!(outcome.lines.is_empty());
        assert_eq!(outcome.totals, PurchaseTotals::default());
    }

    #[test]
    fn test_process_row_limit() {
        let engine = ImportEngine::new(EngineConfig {
            max_rows: 2,
            ..EngineConfig::default()
        });
        let rows = vec![row("A", 100, 1), row("B", 100, 1), row("C", 100, 1), row("D", 100, 1)];
        let err = engine.process(rows).unwrap_err();
        assert!(matches!(err, CoreError::TooManyRows { max: 2, found: 4 }));
    }

    #[test]
    fn test_process_uses_configured_dedup_key() {
        let rows = vec![
            row("A", 99900, 1).with_rate(Money::from_cents(85000)),
            row("A", 99900, 1),
        ];

        let merged = ImportEngine::default().process(rows.clone()).unwrap();
        assert_eq!(merged.lines.len(), 1);

        let engine = ImportEngine::new(EngineConfig {
            dedup_key: DedupKeyMode::BarcodeMrpRate,
            ..EngineConfig::default()
        });
        let split = engine.process(rows).unwrap();
        assert_eq!(split.lines.len(), 2);
        assert_eq!(merged.totals.line_count, 1);
        assert_eq!(split.totals.line_count, 2);

        assert_eq!(split.totals.quantity, merged.totals.quantity);
        assert_eq!(split.totals.taxable, merged.totals.taxable);
        assert_eq!(split.totals.tax, merged.totals.tax);
        assert_eq!(split.totals.amount, merged.totals.amount);
        assert_eq!(split.totals.amount.cents(), 184900);
    }

    #[test]
    fn test_process_accepts_lazy_iterator() {
        let rows = (1..=3).map(|qty| row("A", 1000, qty));
        let outcome = ImportEngine::default().process(rows).unwrap();
        assert_eq!(outcome.rows_read, 3);
        assert_eq!(outcome.lines[0].quantity, 6);
        assert_eq!(outcome.lines[0].merged_rows, vec![1, 2, 3]);
    }

    #[test]
    fn test_check_reports_every_bad_row() {
        let rows = vec![
            row("A", 1000, 1),
            row("B", 1000, 0),
            row("C", 1000, 1).with_discount_percentage(Percent::from_bps(12000)),
            row("D", 1000, 1).with_tax("", Percent::from_bps(-100)),
        ];
        let errors = ImportEngine::default().check(&rows);
        let positions: Vec<Option<usize>> = errors.iter().map(CoreError::position).collect();
        assert_eq!(positions, vec![Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_check_catches_overflow_when_merging() {
        let huge = i64::MAX - 10;
        let rows = vec![row("A", huge, 1), row("A", huge, 1)];
        let engine = ImportEngine::default();

        let errors = engine.check(&rows);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position(), Some(2));
        assert!(matches!(
            errors[0],
            CoreError::InvalidRow { reason: ValidationError::Overflow { .. }, .. }
        ));

        let err = engine.process(rows).unwrap_err();
        assert_eq!(err.to_string(), errors[0].to_string());
    }

    #[test]
    fn test_check_catches_overflow_in_header_totals() {
        let huge = i64::MAX - 10;
        let rows = vec![row("A", huge, 1), row("B", huge, 1)];

        let errors = ImportEngine::default().check(&rows);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::InvalidInput);
        assert!(ImportEngine::default().process(rows).is_err());
    }

    #[test]
    fn test_check_skips_summing_when_a_row_fails() {
        let huge = i64::MAX - 10;
        let rows = vec![row("A", huge, 1), row("A", huge, 1), row("B", 100, 0)];
        let errors = ImportEngine::default().check(&rows);
        let positions: Vec<Option<usize>> = errors.iter().map(CoreError::position).collect();
        assert_eq!(positions, vec![Some(3)]);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ImportEngine>();
    }
}
