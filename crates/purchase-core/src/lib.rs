//! # purchase-core: Pricing, Tax and Dedup Engine for Purchase Imports
//!
//! This crate turns rows read from a supplier spreadsheet into the line items
//! and header totals of a purchase document. It contains all of the
//! calculation logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase Import Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Row Reader (import-runner)                   │   │
//! │  │          CSV / sheet cells ──► ImportRow values                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ purchase-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │    tax    │  │ aggregate │  │  totals   │  │   │
//! │  │   │  Discount │─►│ decompose │─►│  IndexMap │─►│  header   │  │   │
//! │  │   │  Spec     │  │  residual │  │  dedup    │  │  sums     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         engine (orchestration)                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ImportOutcome                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Persistence (external)                       │   │
//! │  │         assigns ids and timestamps, writes the document         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Import rows, resolved and aggregated lines, `Percent`
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Discount precedence and line totals
//! - [`tax`] - Tax-inclusive total decomposition
//! - [`aggregate`] - Order-stable duplicate merging
//! - [`totals`] - Header totals
//! - [`engine`] - Batch orchestration
//! - [`config`] - Engine policy
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Monetary values are minor units (i64), percentages are basis points
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use purchase_core::{ImportEngine, ImportRow, Money, Percent};
//!
//! let rows = vec![
//!     ImportRow::new("8901234567890", Money::from_cents(99900), 5)
//!         .with_discount_amount(Money::from_cents(14900))
//!         .with_tax("7323", Percent::from_bps(1800)),
//!     ImportRow::new("8901234567890", Money::from_cents(99900), 5)
//!         .with_rate(Money::from_cents(85000))
//!         .with_tax("7323", Percent::from_bps(1800)),
//! ];
//!
//! let outcome = ImportEngine::default().process(rows).unwrap();
//! assert_eq!(outcome.lines.len(), 1);
//! assert_eq!(outcome.totals.quantity, 10);
//! assert_eq!(outcome.totals.amount, Money::from_cents(850000));
//! assert!(outcome.is_balanced());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod pricing;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::ItemAggregator;
pub use config::{DedupKeyMode, EngineConfig};
pub use engine::{ImportEngine, ImportOutcome};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use pricing::DiscountSpec;
pub use tax::TaxSplit;
pub use totals::PurchaseTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum rows accepted in one import batch.
///
/// ## Business Reason
/// A supplier invoice sheet runs to a few hundred lines. Anything in the
/// tens of thousands is almost certainly the wrong file.
pub const MAX_IMPORT_ROWS: usize = 10_000;
