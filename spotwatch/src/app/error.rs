//! Application error types.

use std::fmt;

use crate::config::ConfigFileError;
use crate::feed::FeedError;
use crate::notify::NotifyError;
use crate::scheduler::ScheduleError;
use crate::store::StoreError;

/// Errors that can occur while bootstrapping the application.
///
/// Everything here is fatal at startup. Once running, failures are
/// reported per cycle and never surface as an `AppError`.
#[derive(Debug)]
pub enum AppError {
    /// The config file could not be read or holds an invalid value.
    ConfigFile(ConfigFileError),

    /// A required setting is missing or inconsistent.
    Config(String),

    /// Interval or sleep window is invalid.
    Schedule(ScheduleError),

    /// The feed client could not be created.
    Feed(FeedError),

    /// The data directory could not be opened.
    Store(StoreError),

    /// The notifier could not be created.
    Notify(NotifyError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigFile(e) => write!(f, "{}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Schedule(e) => write!(f, "Invalid schedule: {}", e),
            AppError::Feed(e) => write!(f, "Failed to create feed client: {}", e),
            AppError::Store(e) => write!(f, "Failed to open data store: {}", e),
            AppError::Notify(e) => write!(f, "Failed to create notifier: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::ConfigFile(e) => Some(e),
            AppError::Config(_) => None,
            AppError::Schedule(e) => Some(e),
            AppError::Feed(e) => Some(e),
            AppError::Store(e) => Some(e),
            AppError::Notify(e) => Some(e),
        }
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        AppError::ConfigFile(e)
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::Schedule(e)
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Feed(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<NotifyError> for AppError {
    fn from(e: NotifyError) -> Self {
        AppError::Notify(e)
    }
}
