//! Settings structs, one per `[section]` of config.ini.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::geo::DistanceUnit;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub poll: PollSettings,
    pub feed: FeedSettings,
    pub store: StoreSettings,
    pub notify: NotifySettings,
    pub engine: EngineSettings,
}

/// `[poll]`: interval and sleep window.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    /// Seconds between cycles. Always positive.
    pub interval: u64,
    /// Local hour at which polling stops (0-23).
    pub sleep_at: u32,
    /// Local hour at which polling resumes (0-23).
    pub wake_at: u32,
}

/// `[feed]`: live aircraft source.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub url: String,
    /// RapidAPI key. Required for `run` and `once`.
    pub api_key: Option<String>,
    pub api_host: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub on_failure: OnFetchFailure,
    /// Oldest reusable snapshot in seconds (only with `on_failure = reuse`).
    pub reuse_max_age: u64,
}

/// `[store]`: where subscribers and spots are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub directory: PathBuf,
    /// Per-operation timeout in seconds.
    pub timeout: u64,
}

/// `[notify]`: push delivery. Without an endpoint notifications are only logged.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifySettings {
    pub endpoint: Option<String>,
    pub server_key: Option<String>,
    pub timeout: u64,
}

/// `[engine]`: reconciliation tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Subscribers reconciled at once.
    pub concurrency: usize,
    /// Category substring that marks ground test transponders. Empty disables.
    pub ground_marker: String,
    /// Unit of subscriber radii.
    pub distance_unit: DistanceUnit,
}

/// `feed.on_failure` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnFetchFailure {
    #[default]
    Skip,
    Reuse,
}

impl FromStr for OnFetchFailure {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(OnFetchFailure::Skip),
            "reuse" => Ok(OnFetchFailure::Reuse),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OnFetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnFetchFailure::Skip => f.write_str("skip"),
            OnFetchFailure::Reuse => f.write_str("reuse"),
        }
    }
}
