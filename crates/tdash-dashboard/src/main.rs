//! Main entry point for the `tdash` binary.

use anyhow::{Context, Result};
use clap::Parser;
use tdash_common::init_logging;
use tdash_dashboard::{AppError, Args, DashboardApp};
use tracing::{info, warn};

fn main() -> Result<()> {
    let args = Args::parse();

    let config = args.resolve_config().context("Failed to load configuration")?;
    init_logging(&config.logging).map_err(|e| AppError::Logging(e.to_string()))?;

    info!("Starting tdash v{}", env!("CARGO_PKG_VERSION"));

    let app = DashboardApp::new(config, args.run_options()?)?;
    let mut stdout = std::io::stdout().lock();
    let reports = app.run_and_print(&mut stdout)?;

    let failures = reports.iter().filter(|r| r.is_failure()).count();
    if failures > 0 {
        warn!(failures, "Some tabs could not be built");
    }

    Ok(())
}
