//! One poll cycle: fetch, fan out per subscriber, reconcile, report.
//!
//! ```text
//!   FeedSource ──► snapshot ──┬─► subscriber 1: zone filter → load spots → reconcile
//!                             ├─► subscriber 2: ...
//!                             └─► subscriber N  (at most `concurrency` in flight)
//!                                        │
//!                                        ▼
//!                                  CycleReport
//! ```
//!
//! Subscribers are independent: a bad zone or a failed spot load skips only
//! that subscriber. A failed fetch skips the whole cycle unless the
//! [`FetchFailurePolicy`] allows reusing a recent snapshot.

mod report;
mod runner;

pub use report::{CycleOutcome, CycleReport, SkipReason, SnapshotSource, SubscriberOutcome};
pub use runner::CycleRunner;

use std::time::Duration;

use futures::future::BoxFuture;

use crate::geo::DistanceUnit;

/// Default number of subscribers reconciled concurrently.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default deadline for the feed fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for directory reads and spot loads.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Default maximum age of a reused snapshot.
pub const DEFAULT_REUSE_MAX_AGE: Duration = Duration::from_secs(600);

/// What to do when the feed cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Skip the cycle. No spot is touched and no notification is sent.
    #[default]
    SkipCycle,
    /// Reconcile against the last good snapshot if it is no older than
    /// `max_age`; otherwise skip.
    ReuseLastSnapshot { max_age: Duration },
}

/// Settings for [`CycleRunner`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleConfig {
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    pub load_timeout: Duration,
    pub distance_unit: DistanceUnit,
    pub fetch_failure: FetchFailurePolicy,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            distance_unit: DistanceUnit::default(),
            fetch_failure: FetchFailurePolicy::default(),
        }
    }
}

impl CycleConfig {
    /// Sets the fan-out limit. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn with_distance_unit(mut self, unit: DistanceUnit) -> Self {
        self.distance_unit = unit;
        self
    }

    pub fn with_fetch_failure(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_failure = policy;
        self
    }
}

/// Something the scheduler can drive once per interval.
pub trait PollCycle: Send + Sync {
    fn run_cycle(&self) -> BoxFuture<'_, CycleOutcome>;
}
