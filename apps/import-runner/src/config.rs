//! # Runner Configuration
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PURCHASE_*`)
//! 2. Config file (`PURCHASE_CONFIG`, TOML)
//! 3. Defaults
//!
//! ## Configuration File Format
//! ```toml
//! # import.toml
//! [engine]
//! dedup_key = "barcode_mrp"
//! allow_empty_batch = false
//! max_rows = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use purchase_core::{DedupKeyMode, EngineConfig};

use crate::error::{AppError, AppResult};

/// Path of the optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "PURCHASE_CONFIG";

/// Runner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Engine policy.
    pub engine: EngineConfig,
}

impl RunnerConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load() -> AppResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(PathBuf::from(path))?,
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;

        info!(
            dedup_key = %config.engine.dedup_key,
            allow_empty_batch = config.engine.allow_empty_batch,
            max_rows = config.engine.max_rows,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: PathBuf) -> AppResult<Self> {
        debug!(?path, "Loading import config from file");
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text.
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `PURCHASE_*` overrides read through `lookup`.
    ///
    /// Unlike the config file, a bad override is an error rather than
    /// silently ignored: the operator set it on purpose.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("PURCHASE_DEDUP_KEY") {
            self.engine.dedup_key = mode
                .parse::<DedupKeyMode>()
                .map_err(|e| invalid("PURCHASE_DEDUP_KEY", e.to_string()))?;
            debug!(mode = %self.engine.dedup_key, "Overriding dedup key from environment");
        }

        if let Some(flag) = lookup("PURCHASE_ALLOW_EMPTY") {
            self.engine.allow_empty_batch = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    let reason = format!("'{}' is not a boolean", other);
                    return Err(invalid("PURCHASE_ALLOW_EMPTY", reason));
                }
            };
        }

        if let Some(max) = lookup("PURCHASE_MAX_ROWS") {
            self.engine.max_rows = max
                .trim()
                .parse()
                .map_err(|_| {
                    invalid("PURCHASE_MAX_ROWS", format!("'{}' is not a row count", max))
                })?;
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: String) -> AppError {
    AppError::ConfigValue {
        key: key.to_string(),
        reason,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
