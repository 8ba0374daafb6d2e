//! # Import Runner
//!
//! Feeds a supplier CSV through the purchase import engine.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load config ──► read CSV ──► engine.check ──► engine.process ──► JSON │
//! │                                   │                                     │
//! │                                   └─► any rejected row: log each one,  │
//! │                                       exit non-zero, print nothing     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! RUST_LOG=purchase_core=debug import-runner rows.csv > purchase.json
//! ```

mod config;
mod error;
mod reader;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use purchase_core::ImportEngine;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::RunnerConfig;
use crate::error::{AppError, AppResult};

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Import failed");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("import_runner=info,purchase_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();
}

fn run() -> AppResult<()> {
    let path = std::env::args().nth(1).ok_or(AppError::Usage)?;
    let config = RunnerConfig::load()?;
    let engine = ImportEngine::new(config.engine);

    info!(%path, "Reading import rows");
    let rows = reader::read_rows(BufReader::new(File::open(&path)?))?;

    let rejected = engine.check(&rows);
    if !rejected.is_empty() {
        for err in &rejected {
            warn!(position = err.position(), error = %err, "Row rejected");
        }
        return Err(AppError::RowsRejected {
            count: rejected.len(),
        });
    }

    let outcome = engine.process(rows)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &outcome)?;
    writeln!(out)?;

    info!(
        lines = outcome.lines.len(),
        amount = %outcome.totals.amount,
        "Purchase document ready"
    );
    Ok(())
}
