//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use spotwatch::config::{config_file_path, ConfigFile};
use spotwatch::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Resolves `--config`, falling back to ~/.spotwatch/config.ini.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

/// Loads the config file, writing defaults first if it doesn't exist.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path = ConfigFile::ensure_exists_at(&resolve_config_path(path))?;
    Ok(ConfigFile::load_from(&path)?)
}

/// Starts file and stdout logging.
pub fn start_logging() -> Result<LoggingGuard, CliError> {
    init_logging(&default_log_dir(), default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

/// Builds the multi-threaded runtime used by async commands.
pub fn runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))
}
