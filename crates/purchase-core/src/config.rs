//! # Engine Configuration
//!
//! Policy knobs for the import engine. Loading them (environment, TOML) is
//! the caller's job; this module only defines the values and their defaults.
//!
//! ```toml
//! [engine]
//! dedup_key = "barcode_mrp"   # barcode_mrp | barcode_mrp_rate
//! allow_empty_batch = false
//! max_rows = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::MAX_IMPORT_ROWS;

// =============================================================================
// Dedup Key Mode
// =============================================================================

/// Which fields decide that two rows are the same purchase line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKeyMode {
    /// Same barcode and MRP, however the rate was derived.
    #[default]
    BarcodeMrp,

    /// Same barcode, MRP and resolved rate. Rows bought at different
    /// rates stay on separate lines.
    BarcodeMrpRate,
}

impl fmt::Display for DedupKeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupKeyMode::BarcodeMrp => write!(f, "barcode_mrp"),
            DedupKeyMode::BarcodeMrpRate => write!(f, "barcode_mrp_rate"),
        }
    }
}

impl FromStr for DedupKeyMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "barcode_mrp" => Ok(DedupKeyMode::BarcodeMrp),
            "barcode_mrp_rate" => Ok(DedupKeyMode::BarcodeMrpRate),
            other => Err(ValidationError::InvalidFormat {
                field: "dedup_key".to_string(),
                reason: format!(
                    "unknown mode '{}', expected barcode_mrp or barcode_mrp_rate",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

/// Import engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dedup key used by the aggregator.
    pub dedup_key: DedupKeyMode,

    /// When false, processing a batch with no rows fails with `EmptyBatch`.
    pub allow_empty_batch: bool,

    /// Upper bound on rows in one batch.
    pub max_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            dedup_key: DedupKeyMode::BarcodeMrp,
            allow_empty_batch: false,
            max_rows: MAX_IMPORT_ROWS,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
