//! User configuration (`~/.spotwatch/config.ini`).
//!
//! # Example
//!
//! ```ignore
//! use spotwatch::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! println!("polling every {}s", config.poll.interval);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{default_store_directory, DEFAULT_STORE_TIMEOUT_SECS};
pub use file::{
    config_directory, config_file_path, ConfigFileError, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
pub use settings::{
    ConfigFile, EngineSettings, FeedSettings, NotifySettings, OnFetchFailure, PollSettings,
    StoreSettings,
};
