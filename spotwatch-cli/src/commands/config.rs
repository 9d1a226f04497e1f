//! `spotwatch config`: inspect and initialize config.ini.

use std::path::Path;

use clap::Subcommand;
use spotwatch::config::ConfigFile;

use super::common::{load_config, resolve_config_path};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", resolve_config_path(config_path).display());
            Ok(())
        }
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Init { force } => run_init(config_path, force),
    }
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let masked = |v: &Option<String>| match v {
        Some(_) => "(set)".to_string(),
        None => "(not set)".to_string(),
    };

    println!("[poll]");
    println!("  interval      = {}s", config.poll.interval);
    println!("  sleep_at      = {:02}:00", config.poll.sleep_at);
    println!("  wake_at       = {:02}:00", config.poll.wake_at);
    println!("[feed]");
    println!("  url           = {}", config.feed.url);
    println!("  api_key       = {}", masked(&config.feed.api_key));
    println!("  api_host      = {}", config.feed.api_host);
    println!("  timeout       = {}s", config.feed.timeout);
    println!("  on_failure    = {}", config.feed.on_failure);
    println!("  reuse_max_age = {}s", config.feed.reuse_max_age);
    println!("[store]");
    println!("  directory     = {}", config.store.directory.display());
    println!("  timeout       = {}s", config.store.timeout);
    println!("[notify]");
    println!(
        "  endpoint      = {}",
        config.notify.endpoint.as_deref().unwrap_or("(log only)")
    );
    println!("  server_key    = {}", masked(&config.notify.server_key));
    println!("  timeout       = {}s", config.notify.timeout);
    println!("[engine]");
    println!("  concurrency   = {}", config.engine.concurrency);
    println!("  ground_marker = {}", config.engine.ground_marker);
    println!("  distance_unit = {}", config.engine.distance_unit.suffix());
    Ok(())
}

fn run_init(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    println!("Set api_key in the [feed] section before running 'spotwatch run'.");
    Ok(())
}
