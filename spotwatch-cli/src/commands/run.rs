//! `spotwatch run`: the long-running poll loop.

use std::path::Path;

use spotwatch::app::{AppConfig, SpotWatchApp};
use tokio_util::sync::CancellationToken;

use super::common::{load_config, runtime, start_logging};
use crate::error::CliError;

pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let app_config = AppConfig::from_config_file(&config)?;
    let _logging = start_logging()?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        signal.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    println!("Polling every {}s. Press Ctrl+C to stop.", config.poll.interval);

    let runtime = runtime()?;
    let cycles = runtime.block_on(async {
        let app = SpotWatchApp::start(app_config).await?;
        Ok::<_, CliError>(app.run(shutdown).await)
    })?;

    tracing::info!(cycles, "SpotWatch stopped");
    Ok(())
}
