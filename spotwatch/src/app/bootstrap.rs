//! Application bootstrap.
//!
//! Wires the feed, the JSON stores, the notifier, the reconciler, the cycle
//! runner and the scheduler together in one place.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::cycle::{CycleOutcome, CycleRunner};
use crate::feed::{AdsbExchangeFeed, FeedSource};
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::reconcile::Reconciler;
use crate::scheduler::PollScheduler;
use crate::store::{JsonSpotStore, JsonSubscriberDirectory};

/// The assembled watcher.
///
/// # Example
///
/// ```ignore
/// use spotwatch::app::{AppConfig, SpotWatchApp};
///
/// let app = SpotWatchApp::start(config).await?;
/// app.run(shutdown).await;
/// ```
pub struct SpotWatchApp {
    runner: CycleRunner,
    scheduler: PollScheduler,
    directory: Arc<JsonSubscriberDirectory>,
    spots: Arc<JsonSpotStore>,
    config: AppConfig,
}

impl SpotWatchApp {
    /// Builds the production adapters and assembles the application.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built, the data
    /// directory cannot be opened or the schedule is invalid.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        let feed: Arc<dyn FeedSource> = Arc::new(AdsbExchangeFeed::new(config.feed.clone())?);

        let notifier: Arc<dyn Notifier> = match &config.webhook {
            Some(webhook) => {
                info!(endpoint = %webhook.endpoint, "Push notifications enabled");
                Arc::new(WebhookNotifier::new(webhook.clone())?)
            }
            None => {
                info!("No notify.endpoint configured; notifications will only be logged");
                Arc::new(LogNotifier)
            }
        };

        Self::assemble(config, feed, notifier).await
    }

    /// Assembles the application around the given feed and notifier.
    ///
    /// Subscribers and spots always come from `config.store_dir`.
    pub async fn assemble(
        config: AppConfig,
        feed: Arc<dyn FeedSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let scheduler = PollScheduler::new(config.interval, config.window)?;

        let spots = Arc::new(JsonSpotStore::open(&config.store_dir).await?);
        let directory = Arc::new(JsonSubscriberDirectory::new(&config.store_dir));

        let reconciler = Reconciler::new(spots.clone(), notifier)
            .with_policy(config.exclusion.clone())
            .with_store_timeout(config.store_timeout)
            .with_notify_timeout(config.notify_timeout);

        let runner = CycleRunner::new(
            feed,
            directory.clone(),
            spots.clone(),
            reconciler,
            config.cycle.clone(),
        );

        Ok(Self {
            runner,
            scheduler,
            directory,
            spots,
            config,
        })
    }

    /// Runs the poll loop until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) -> u64 {
        info!(
            version = crate::VERSION,
            interval_secs = self.config.interval.as_secs(),
            sleep_at = self.config.window.sleep_at(),
            wake_at = self.config.window.wake_at(),
            data = %self.config.store_dir.display(),
            "SpotWatch started"
        );
        if self.config.window.is_disabled() {
            info!("Sleep window disabled; polling around the clock");
        }

        self.scheduler.run(&self.runner, shutdown).await
    }

    /// Runs a single cycle immediately.
    pub async fn run_once(&self) -> CycleOutcome {
        self.runner.run_cycle().await
    }

    pub fn directory(&self) -> &JsonSubscriberDirectory {
        &self.directory
    }

    pub fn spots(&self) -> &JsonSpotStore {
        &self.spots
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
