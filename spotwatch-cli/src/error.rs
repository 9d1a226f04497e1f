//! CLI error handling with user-friendly messages.
//!
//! Centralizes error reporting for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;
use std::process;

use spotwatch::app::AppError;
use spotwatch::config::{config_file_path, ConfigFileError};
use spotwatch::store::StoreError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Invalid command-line input or configuration
    Config(String),
    /// Application failed to start
    App(AppError),
    /// Subscriber registry could not be read or written
    Store(StoreError),
    /// Failed to create the Tokio runtime
    Runtime(String),
}

impl CliError {
    /// Exit the process with an error message and exit code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::App(AppError::Config(_)) | CliError::ConfigFile(_) => {
                eprintln!();
                eprintln!("Edit your configuration at:");
                eprintln!("  {}", config_file_path().display());
                eprintln!("or run 'spotwatch config init' to write a fresh default file.");
            }
            CliError::App(AppError::Store(_)) | CliError::Store(_) => {
                eprintln!();
                eprintln!("Check that [store] directory in config.ini exists and is writable.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Store(e) => write!(f, "Subscriber registry error: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}
