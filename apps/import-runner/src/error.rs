//! Error types for the import runner.

use purchase_core::CoreError;

/// Import runner errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Usage: import-runner <rows.csv>")]
    Usage,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config value for {key}: {reason}")]
    ConfigValue { key: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Import(#[from] CoreError),

    #[error("{count} row(s) rejected")]
    RowsRejected { count: usize },
}

/// Convenience alias for runner results.
pub type AppResult<T> = Result<T, AppError>;
