//! Cycle execution.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::report::{CycleOutcome, CycleReport, SkipReason, SnapshotSource, SubscriberOutcome};
use super::{CycleConfig, FetchFailurePolicy, PollCycle};
use crate::deadline::with_deadline;
use crate::feed::{FeedError, FeedSource};
use crate::model::{Subscriber, TrackedObject};
use crate::reconcile::Reconciler;
use crate::store::{SpotStore, StoreError, SubscriberDirectory};

struct Snapshot {
    objects: Arc<Vec<TrackedObject>>,
    fetched_at: Instant,
}

/// Runs poll cycles against injected collaborators.
pub struct CycleRunner {
    feed: Arc<dyn FeedSource>,
    directory: Arc<dyn SubscriberDirectory>,
    store: Arc<dyn SpotStore>,
    reconciler: Reconciler,
    config: CycleConfig,
    last_good: Mutex<Option<Snapshot>>,
}

impl CycleRunner {
    /// Creates a runner.
    ///
    /// `store` is used for spot loads; the reconciler carries its own handle
    /// for mutations and is normally built over the same store.
    pub fn new(
        feed: Arc<dyn FeedSource>,
        directory: Arc<dyn SubscriberDirectory>,
        store: Arc<dyn SpotStore>,
        reconciler: Reconciler,
        config: CycleConfig,
    ) -> Self {
        Self {
            feed,
            directory,
            store,
            reconciler,
            config,
            last_good: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Runs one cycle to completion.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let started = Instant::now();

        let (objects, source) = match self.acquire_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(reason) => return CycleOutcome::Skipped(reason),
        };

        let subscribers = match with_deadline(
            self.config.load_timeout,
            self.directory.list_subscribers(),
            StoreError::Timeout,
        )
        .await
        {
            Ok(subscribers) => subscribers,
            Err(e) => {
                warn!(operation = "list_subscribers", error = %e, "Skipping cycle");
                return CycleOutcome::Skipped(SkipReason::Directory(e));
            }
        };

        debug!(
            objects = objects.len(),
            subscribers = subscribers.len(),
            concurrency = self.config.concurrency,
            "Reconciling subscribers"
        );

        let pending: Vec<_> = subscribers
            .iter()
            .map(|subscriber| self.reconcile_subscriber(subscriber, &objects))
            .collect();
        let outcomes: Vec<SubscriberOutcome> = stream::iter(pending)
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let report = CycleReport {
            snapshot_size: objects.len(),
            source,
            subscribers: outcomes,
            duration: started.elapsed(),
        };

        info!(
            objects = report.snapshot_size,
            subscribers = report.subscribers.len(),
            entered = report.entered(),
            exited = report.exited(),
            failures = report.failures(),
            duration_ms = report.duration.as_millis() as u64,
            "Cycle complete"
        );

        CycleOutcome::Completed(report)
    }

    async fn acquire_snapshot(
        &self,
    ) -> Result<(Arc<Vec<TrackedObject>>, SnapshotSource), SkipReason> {
        let fetched = with_deadline(
            self.config.fetch_timeout,
            self.feed.fetch_snapshot(),
            FeedError::Timeout,
        )
        .await;

        match fetched {
            Ok(objects) => {
                let objects = Arc::new(objects);
                if let FetchFailurePolicy::ReuseLastSnapshot { .. } = self.config.fetch_failure {
                    *self.last_good.lock() = Some(Snapshot {
                        objects: Arc::clone(&objects),
                        fetched_at: Instant::now(),
                    });
                }
                Ok((objects, SnapshotSource::Fresh))
            }
            Err(e) => self.fallback(e),
        }
    }

    fn fallback(
        &self,
        error: FeedError,
    ) -> Result<(Arc<Vec<TrackedObject>>, SnapshotSource), SkipReason> {
        let max_age = match self.config.fetch_failure {
            FetchFailurePolicy::SkipCycle => {
                warn!(feed = self.feed.name(), error = %error, "Feed fetch failed; skipping cycle");
                return Err(SkipReason::Feed(error));
            }
            FetchFailurePolicy::ReuseLastSnapshot { max_age } => max_age,
        };

        let last_good = self.last_good.lock();
        match last_good.as_ref() {
            Some(snapshot) if snapshot.fetched_at.elapsed() <= max_age => {
                let age = snapshot.fetched_at.elapsed();
                warn!(
                    feed = self.feed.name(),
                    error = %error,
                    age_secs = age.as_secs(),
                    "Feed fetch failed; reusing last snapshot"
                );
                Ok((Arc::clone(&snapshot.objects), SnapshotSource::Reused { age }))
            }
            _ => {
                warn!(
                    feed = self.feed.name(),
                    error = %error,
                    "Feed fetch failed and no recent snapshot; skipping cycle"
                );
                Err(SkipReason::Feed(error))
            }
        }
    }

    async fn reconcile_subscriber(
        &self,
        subscriber: &Subscriber,
        objects: &[TrackedObject],
    ) -> SubscriberOutcome {
        let zone = match subscriber.zone() {
            Ok(zone) => zone,
            Err(error) => {
                warn!(subscriber_id = %subscriber.id, error = %error, "Invalid zone; skipping subscriber");
                return SubscriberOutcome::InvalidZone {
                    subscriber_id: subscriber.id.clone(),
                    error,
                };
            }
        };

        let current = zone.filter(objects, self.config.distance_unit);

        let persisted = match with_deadline(
            self.config.load_timeout,
            self.store.load_spots(&subscriber.id),
            StoreError::Timeout,
        )
        .await
        {
            Ok(spots) => spots,
            Err(error) => {
                warn!(
                    subscriber_id = %subscriber.id,
                    operation = "load_spots",
                    error = %error,
                    "Failed to load spots; skipping subscriber"
                );
                return SubscriberOutcome::LoadFailed {
                    subscriber_id: subscriber.id.clone(),
                    error,
                };
            }
        };

        SubscriberOutcome::Reconciled(self.reconciler.reconcile(subscriber, &current, &persisted).await)
    }
}

impl PollCycle for CycleRunner {
    fn run_cycle(&self) -> BoxFuture<'_, CycleOutcome> {
        CycleRunner::run_cycle(self).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use futures::future;

    use crate::notify::{Notification, Notifier, NotifyError};
    use crate::model::TrackedSpot;
    use crate::store::MemoryStore;

    /// Serves queued responses, then fails.
    struct ScriptedFeed {
        responses: Mutex<VecDeque<Result<Vec<TrackedObject>, FeedError>>>,
    }

    impl ScriptedFeed {
        fn new(responses: Vec<Result<Vec<TrackedObject>, FeedError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    impl FeedSource for ScriptedFeed {
        fn fetch_snapshot(&self) -> BoxFuture<'_, Result<Vec<TrackedObject>, FeedError>> {
            let next = self
                .responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(FeedError::Http("script exhausted".to_string())));
            future::ready(next).boxed()
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl Notifier for CountingNotifier {
        fn notify<'a>(
            &'a self,
            subscriber: &'a Subscriber,
            _notification: &'a Notification,
        ) -> BoxFuture<'a, Result<(), NotifyError>> {
            self.sent.lock().push(subscriber.id.clone());
            future::ready(Ok(())).boxed()
        }
    }

    struct BrokenDirectory;

    impl SubscriberDirectory for BrokenDirectory {
        fn list_subscribers(&self) -> BoxFuture<'_, Result<Vec<Subscriber>, StoreError>> {
            future::ready(Err(StoreError::Unavailable("offline".to_string()))).boxed()
        }
    }

    /// Fails spot loads for one subscriber.
    struct PartialStore {
        inner: Arc<MemoryStore>,
        broken: String,
    }

    impl SpotStore for PartialStore {
        fn load_spots<'a>(
            &'a self,
            subscriber_id: &'a str,
        ) -> BoxFuture<'a, Result<Vec<TrackedSpot>, StoreError>> {
            if subscriber_id == self.broken {
                return future::ready(Err(StoreError::Corrupt("bad record".to_string()))).boxed();
            }
            self.inner.load_spots(subscriber_id)
        }

        fn delete_spot<'a>(
            &'a self,
            subscriber_id: &'a str,
            object_id: &'a str,
        ) -> BoxFuture<'a, Result<(), StoreError>> {
            self.inner.delete_spot(subscriber_id, object_id)
        }

        fn create_spot<'a>(&'a self, spot: &'a TrackedSpot) -> BoxFuture<'a, Result<(), StoreError>> {
            self.inner.create_spot(spot)
        }
    }

    fn near_dfw(id: &str) -> TrackedObject {
        TrackedObject::new(id, 32.90, -97.04).with_category("C17")
    }

    fn near_sea(id: &str) -> TrackedObject {
        TrackedObject::new(id, 47.45, -122.31).with_category("P8")
    }

    fn dfw_watcher(id: &str) -> Subscriber {
        Subscriber::new(id, "tok", 32.8998, -97.0403, 25.0)
    }

    fn runner_with(
        feed: ScriptedFeed,
        store: Arc<MemoryStore>,
        notifier: Arc<CountingNotifier>,
        config: CycleConfig,
    ) -> CycleRunner {
        let reconciler = Reconciler::new(store.clone(), notifier);
        CycleRunner::new(Arc::new(feed), store.clone(), store, reconciler, config)
    }

    #[tokio::test]
    async fn test_cycle_reconciles_each_subscriber_against_its_zone() {
        let store = Arc::new(MemoryStore::with_subscribers(vec![
            dfw_watcher("dfw"),
            Subscriber::new("sea", "tok", 47.4502, -122.3088, 25.0),
        ]));
        let notifier = Arc::new(CountingNotifier::default());
        let feed = ScriptedFeed::new(vec![Ok(vec![near_dfw("AAA"), near_sea("BBB")])]);
        let runner = runner_with(feed, store.clone(), notifier.clone(), CycleConfig::default());

        let outcome = runner.run_cycle().await;
        let report = outcome.report().unwrap();

        assert_eq!(report.snapshot_size, 2);
        assert_eq!(report.source, SnapshotSource::Fresh);
        assert_eq!(report.entered(), 2);
        assert_eq!(store.spots_for("dfw")[0].object_id, "AAA");
        assert_eq!(store.spots_for("sea")[0].object_id, "BBB");
        assert_eq!(notifier.sent.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_outcomes_follow_directory_order() {
        let subscribers: Vec<Subscriber> =
            (0..10).map(|i| dfw_watcher(&format!("u{}", i))).collect();
        let store = Arc::new(MemoryStore::with_subscribers(subscribers));
        let feed = ScriptedFeed::new(vec![Ok(vec![near_dfw("AAA")])]);
        let runner = runner_with(
            feed,
            store,
            Arc::new(CountingNotifier::default()),
            CycleConfig::default().with_concurrency(3),
        );

        let outcome = runner.run_cycle().await;
        let ids: Vec<&str> = outcome
            .report()
            .unwrap()
            .subscribers
            .iter()
            .map(|o| o.subscriber_id())
            .collect();
        let expected: Vec<String> = (0..10).map(|i| format!("u{}", i)).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_runner_cycles_on_spawned_task() {
        let store = Arc::new(MemoryStore::with_subscribers(vec![
            dfw_watcher("u1"),
            dfw_watcher("u2"),
        ]));
        let feed = ScriptedFeed::new(vec![Ok(vec![near_dfw("AAA")])]);
        let runner: Arc<dyn PollCycle> = Arc::new(runner_with(
            feed,
            store.clone(),
            Arc::new(CountingNotifier::default()),
            CycleConfig::default().with_concurrency(2),
        ));

        let handle = tokio::spawn(async move { runner.run_cycle().await });
        let outcome = handle.await.unwrap();

        assert_eq!(outcome.report().unwrap().entered(), 2);
        assert_eq!(store.spots_for("u2").len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_zone_skips_only_that_subscriber() {
        let store = Arc::new(MemoryStore::with_subscribers(vec![
            Subscriber::new("bad", "tok", 32.9, -97.0, -5.0),
            dfw_watcher("good"),
        ]));
        let feed = ScriptedFeed::new(vec![Ok(vec![near_dfw("AAA")])]);
        let runner = runner_with(
            feed,
            store.clone(),
            Arc::new(CountingNotifier::default()),
            CycleConfig::default(),
        );

        let outcome = runner.run_cycle().await;
        let report = outcome.report().unwrap();

        assert!(matches!(
            report.subscribers[0],
            SubscriberOutcome::InvalidZone { .. }
        ));
        assert_eq!(report.entered(), 1);
        assert!(store.spots_for("bad").is_empty());
        assert_eq!(store.spots_for("good").len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_cycle_without_mutation() {
        let store = Arc::new(MemoryStore::with_subscribers(vec![dfw_watcher("u1")]));
        store
            .create_spot(&TrackedSpot::new("u1", "OLD", "", "C17"))
            .await
            .unwrap();
        let notifier = Arc::new(CountingNotifier::default());
        let feed = ScriptedFeed::new(vec![Err(FeedError::Http("503".to_string()))]);
        let runner = runner_with(feed, store.clone(), notifier.clone(), CycleConfig::default());

        let outcome = runner.run_cycle().await;

        assert_eq!(
            outcome,
            CycleOutcome::Skipped(SkipReason::Feed(FeedError::Http("503".to_string())))
        );
        assert_eq!(store.spots_for("u1").len(), 1);
        assert!(notifier.sent.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reuse_policy_uses_recent_snapshot_only() {
        let store = Arc::new(MemoryStore::with_subscribers(vec![dfw_watcher("u1")]));
        let notifier = Arc::new(CountingNotifier::default());
        let feed = ScriptedFeed::new(vec![
            Ok(vec![near_dfw("AAA")]),
            Err(FeedError::Timeout(30)),
            Err(FeedError::Timeout(30)),
        ]);
        let config = CycleConfig::default().with_fetch_failure(
            FetchFailurePolicy::ReuseLastSnapshot {
                max_age: Duration::from_secs(300),
            },
        );
        let runner = runner_with(feed, store.clone(), notifier.clone(), config);

        assert!(runner.run_cycle().await.is_completed());

        tokio::time::advance(Duration::from_secs(190)).await;
        let reused = runner.run_cycle().await;
        let report = reused.report().unwrap();
        assert_eq!(
            report.source,
            SnapshotSource::Reused {
                age: Duration::from_secs(190)
            }
        );
        assert_eq!(report.subscribers[0].report().unwrap().retained, 1);
        assert_eq!(store.spots_for("u1").len(), 1);

        tokio::time::advance(Duration::from_secs(190)).await;
        let stale = runner.run_cycle().await;
        assert!(matches!(stale, CycleOutcome::Skipped(SkipReason::Feed(_))));
        assert_eq!(notifier.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_directory_failure_skips_cycle() {
        let store = Arc::new(MemoryStore::new());
        let reconciler = Reconciler::new(store.clone(), Arc::new(CountingNotifier::default()));
        let runner = CycleRunner::new(
            Arc::new(ScriptedFeed::new(vec![Ok(vec![near_dfw("AAA")])])),
            Arc::new(BrokenDirectory),
            store,
            reconciler,
            CycleConfig::default(),
        );

        let outcome = runner.run_cycle().await;
        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::Directory(StoreError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_failure_skips_only_that_subscriber() {
        let memory = Arc::new(MemoryStore::with_subscribers(vec![
            dfw_watcher("broken"),
            dfw_watcher("fine"),
        ]));
        let store = Arc::new(PartialStore {
            inner: memory.clone(),
            broken: "broken".to_string(),
        });
        let reconciler = Reconciler::new(store.clone(), Arc::new(CountingNotifier::default()));
        let runner = CycleRunner::new(
            Arc::new(ScriptedFeed::new(vec![Ok(vec![near_dfw("AAA")])])),
            memory.clone(),
            store,
            reconciler,
            CycleConfig::default(),
        );

        let outcome = runner.run_cycle().await;
        let report = outcome.report().unwrap();

        assert!(matches!(
            report.subscribers[0],
            SubscriberOutcome::LoadFailed { .. }
        ));
        assert!(memory.spots_for("broken").is_empty());
        assert_eq!(memory.spots_for("fine").len(), 1);
    }
}
