//! SpotWatch CLI
//!
//! Runs the aircraft watcher and manages its subscribers and configuration.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::subscriber::SubscriberCommands;

#[derive(Parser)]
#[command(name = "spotwatch")]
#[command(version, about = "Alerts when military aircraft enter your airspace", long_about = None)]
struct Cli {
    /// Path to config.ini (default: ~/.spotwatch/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the feed until Ctrl+C
    Run,

    /// Run a single poll cycle now and print what changed
    Once,

    /// Manage subscribers
    Subscriber {
        #[command(subcommand)]
        command: SubscriberCommands,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run => commands::run::run(config_path),
        Commands::Once => commands::once::run(config_path),
        Commands::Subscriber { command } => commands::subscriber::run(config_path, command),
        Commands::Config { command } => commands::config::run(config_path, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
