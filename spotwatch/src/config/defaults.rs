//! Default values for every configuration setting.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::cycle::{DEFAULT_CONCURRENCY, DEFAULT_REUSE_MAX_AGE};
use crate::feed::{DEFAULT_FEED_HOST, DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL};
use crate::geo::DistanceUnit;
use crate::notify::DEFAULT_NOTIFY_TIMEOUT_SECS;
use crate::reconcile::DEFAULT_GROUND_MARKER;
use crate::scheduler::{DEFAULT_INTERVAL_SECS, DEFAULT_SLEEP_AT, DEFAULT_WAKE_AT};

/// Default store operation timeout in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Default data directory (~/.spotwatch/data).
pub fn default_store_directory() -> PathBuf {
    config_directory().join("data")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            poll: PollSettings {
                interval: DEFAULT_INTERVAL_SECS,
                sleep_at: DEFAULT_SLEEP_AT,
                wake_at: DEFAULT_WAKE_AT,
            },
            feed: FeedSettings {
                url: DEFAULT_FEED_URL.to_string(),
                api_key: None,
                api_host: DEFAULT_FEED_HOST.to_string(),
                timeout: DEFAULT_FEED_TIMEOUT_SECS,
                on_failure: OnFetchFailure::Skip,
                reuse_max_age: DEFAULT_REUSE_MAX_AGE.as_secs(),
            },
            store: StoreSettings {
                directory: default_store_directory(),
                timeout: DEFAULT_STORE_TIMEOUT_SECS,
            },
            notify: NotifySettings {
                endpoint: None,
                server_key: None,
                timeout: DEFAULT_NOTIFY_TIMEOUT_SECS,
            },
            engine: EngineSettings {
                concurrency: DEFAULT_CONCURRENCY,
                ground_marker: DEFAULT_GROUND_MARKER.to_string(),
                distance_unit: DistanceUnit::NauticalMiles,
            },
        }
    }
}
