//! Application configuration for `SpotWatchApp`.
//!
//! `AppConfig` is the validated, typed view of [`ConfigFile`]: durations
//! instead of seconds, a checked sleep window, and the feed and notifier
//! settings ready to hand to their adapters.

use std::path::PathBuf;
use std::time::Duration;

use super::error::AppError;
use crate::config::{ConfigFile, OnFetchFailure};
use crate::cycle::{CycleConfig, FetchFailurePolicy};
use crate::feed::FeedConfig;
use crate::notify::WebhookConfig;
use crate::reconcile::ExclusionPolicy;
use crate::scheduler::{ScheduleError, SleepWindow};

/// Everything needed to assemble the application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub feed: FeedConfig,
    /// Directory holding `subscribers.json` and `spots.json`.
    pub store_dir: PathBuf,
    /// Push delivery; `None` logs notifications instead.
    pub webhook: Option<WebhookConfig>,
    pub cycle: CycleConfig,
    pub exclusion: ExclusionPolicy,
    pub store_timeout: Duration,
    pub notify_timeout: Duration,
    pub interval: Duration,
    pub window: SleepWindow,
}

impl AppConfig {
    /// Builds an `AppConfig` from the user's config file.
    ///
    /// # Errors
    ///
    /// Fails if the feed API key is missing, the interval is zero or the
    /// sleep window hours are out of range.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, AppError> {
        let api_key = file.feed.api_key.clone().ok_or_else(|| {
            AppError::Config(
                "feed.api_key is not set (add it to the [feed] section of config.ini)"
                    .to_string(),
            )
        })?;

        if file.poll.interval == 0 {
            return Err(ScheduleError::ZeroInterval.into());
        }
        let window = SleepWindow::new(file.poll.sleep_at, file.poll.wake_at)?;

        let feed = FeedConfig::new(api_key)
            .with_url(file.feed.url.clone())
            .with_api_host(file.feed.api_host.clone())
            .with_timeout(Duration::from_secs(file.feed.timeout));

        let notify_timeout = Duration::from_secs(file.notify.timeout);
        let webhook = file.notify.endpoint.as_ref().map(|endpoint| {
            let config = WebhookConfig::new(endpoint.clone()).with_timeout(notify_timeout);
            match &file.notify.server_key {
                Some(key) => config.with_server_key(key.clone()),
                None => config,
            }
        });

        let store_timeout = Duration::from_secs(file.store.timeout);
        let fetch_failure = match file.feed.on_failure {
            OnFetchFailure::Skip => FetchFailurePolicy::SkipCycle,
            OnFetchFailure::Reuse => FetchFailurePolicy::ReuseLastSnapshot {
                max_age: Duration::from_secs(file.feed.reuse_max_age),
            },
        };
        let cycle = CycleConfig::default()
            .with_concurrency(file.engine.concurrency)
            .with_fetch_timeout(Duration::from_secs(file.feed.timeout))
            .with_load_timeout(store_timeout)
            .with_distance_unit(file.engine.distance_unit)
            .with_fetch_failure(fetch_failure);

        Ok(Self {
            feed,
            store_dir: file.store.directory.clone(),
            webhook,
            cycle,
            exclusion: ExclusionPolicy::new(file.engine.ground_marker.clone()),
            store_timeout,
            notify_timeout,
            interval: Duration::from_secs(file.poll.interval),
            window,
        })
    }

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::DistanceUnit;

    fn file_with_key() -> ConfigFile {
        let mut file = ConfigFile::default();
        file.feed.api_key = Some("key".to_string());
        file
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let err = AppConfig::from_config_file(&ConfigFile::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_defaults_map_through() {
        let config = AppConfig::from_config_file(&file_with_key()).unwrap();

        assert_eq!(config.interval, Duration::from_secs(190));
        assert_eq!(config.window, SleepWindow::default());
        assert_eq!(config.feed.api_key, "key");
        assert!(config.webhook.is_none());
        assert_eq!(config.cycle.fetch_failure, FetchFailurePolicy::SkipCycle);
        assert_eq!(config.cycle.concurrency, 8);
        assert_eq!(config.exclusion.marker(), "GND");
    }

    #[test]
    fn test_reuse_policy_and_webhook() {
        let mut file = file_with_key();
        file.feed.on_failure = OnFetchFailure::Reuse;
        file.feed.reuse_max_age = 120;
        file.notify.endpoint = Some("https://push.example/send".to_string());
        file.notify.server_key = Some("server".to_string());
        file.engine.distance_unit = DistanceUnit::Kilometers;

        let config = AppConfig::from_config_file(&file).unwrap();

        assert_eq!(
            config.cycle.fetch_failure,
            FetchFailurePolicy::ReuseLastSnapshot {
                max_age: Duration::from_secs(120)
            }
        );
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.server_key.as_deref(), Some("server"));
        assert_eq!(config.cycle.distance_unit, DistanceUnit::Kilometers);
    }

    #[test]
    fn test_invalid_hours_rejected() {
        let mut file = file_with_key();
        file.poll.sleep_at = 30;
        assert!(matches!(
            AppConfig::from_config_file(&file),
            Err(AppError::Schedule(ScheduleError::InvalidHour { .. }))
        ));
    }
}
