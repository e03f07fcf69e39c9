//! `envelope-migrate`: re-encrypt a column dump read from stdin.
//!
//! Each input line is one stored envelope; each output line is the same value
//! encrypted with the engine named by `ENCRYPTION_VERSION`. Blank lines stand
//! for NULL columns and pass through unchanged, so output rows line up with
//! input rows.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`](config::Config) from environment variables.
//! 2. Initialise telemetry (JSON logs on stderr, optional OTLP export).
//! 3. Build the target engine and stream stdin to stdout.

mod config;
mod migrate;
mod telemetry;

use anyhow::{Context, Result};
use tokio::io::{self, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        eprintln!("ERROR: envelope-migrate configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        target_version = %cfg.encryption_version,
        skip_undecryptable = cfg.skip_undecryptable,
        "envelope-migrate starting"
    );

    // -----------------------------------------------------------------------
    // 3. Migration
    // -----------------------------------------------------------------------
    let target = fieldcrypt::new_encryptor(&cfg.target_crypto())
        .context("failed to build target encryptor")?;

    let result = migrate::run(
        BufReader::new(io::stdin()),
        io::stdout(),
        cfg.source_secret(),
        &target,
        cfg.skip_undecryptable,
    )
    .await;

    telemetry::shutdown();
    let summary = result?;
    info!(
        migrated = summary.migrated,
        skipped = summary.skipped,
        blank = summary.blank,
        "envelope-migrate finished"
    );
    Ok(())
}
