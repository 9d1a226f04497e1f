//! Cycle-level outcomes.

use std::fmt;
use std::time::Duration;

use crate::feed::FeedError;
use crate::geo::GeoError;
use crate::reconcile::SubscriberReport;
use crate::store::StoreError;

/// Where the snapshot reconciled in a cycle came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapshotSource {
    /// Fetched during this cycle.
    Fresh,
    /// Last good snapshot, reused after a failed fetch.
    Reused { age: Duration },
}

/// Why a cycle performed no reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The feed fetch failed and no usable snapshot was available.
    Feed(FeedError),
    /// The subscriber directory could not be read.
    Directory(StoreError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Feed(e) => write!(f, "feed unavailable: {}", e),
            SkipReason::Directory(e) => write!(f, "subscriber directory unavailable: {}", e),
        }
    }
}

/// Result of handling one subscriber within a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriberOutcome {
    Reconciled(SubscriberReport),
    /// The subscriber's center or radius is unusable; nothing was touched.
    InvalidZone {
        subscriber_id: String,
        error: GeoError,
    },
    /// Persisted spots could not be loaded; nothing was touched.
    LoadFailed {
        subscriber_id: String,
        error: StoreError,
    },
}

impl SubscriberOutcome {
    pub fn subscriber_id(&self) -> &str {
        match self {
            SubscriberOutcome::Reconciled(report) => &report.subscriber_id,
            SubscriberOutcome::InvalidZone { subscriber_id, .. }
            | SubscriberOutcome::LoadFailed { subscriber_id, .. } => subscriber_id,
        }
    }

    pub fn report(&self) -> Option<&SubscriberReport> {
        match self {
            SubscriberOutcome::Reconciled(report) => Some(report),
            _ => None,
        }
    }
}

/// Aggregated results of one completed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub snapshot_size: usize,
    pub source: SnapshotSource,
    /// One entry per subscriber, in directory order.
    pub subscribers: Vec<SubscriberOutcome>,
    pub duration: Duration,
}

impl CycleReport {
    fn reports(&self) -> impl Iterator<Item = &SubscriberReport> {
        self.subscribers.iter().filter_map(SubscriberOutcome::report)
    }

    pub fn entered(&self) -> usize {
        self.reports().map(SubscriberReport::entered).sum()
    }

    pub fn exited(&self) -> usize {
        self.reports().map(SubscriberReport::exited).sum()
    }

    /// Failed transitions plus skipped subscribers.
    pub fn failures(&self) -> usize {
        let transitions: usize = self.reports().map(SubscriberReport::failure_count).sum();
        transitions + self.skipped_subscribers()
    }

    pub fn skipped_subscribers(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|o| o.report().is_none())
            .count()
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} objects, {} subscribers: {} entered, {} exited, {} failures ({:.1}s)",
            self.snapshot_size,
            self.subscribers.len(),
            self.entered(),
            self.exited(),
            self.failures(),
            self.duration.as_secs_f64()
        )?;
        if let SnapshotSource::Reused { age } = self.source {
            write!(f, " [reused snapshot, {}s old]", age.as_secs())?;
        }
        Ok(())
    }
}

/// What happened when a cycle was run.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Skipped(SkipReason),
}

impl CycleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CycleOutcome::Completed(_))
    }

    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            CycleOutcome::Completed(report) => Some(report),
            CycleOutcome::Skipped(_) => None,
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::Completed(report) => write!(f, "cycle complete: {}", report),
            CycleOutcome::Skipped(reason) => write!(f, "cycle skipped: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{Transition, TransitionError, TransitionKind};

    fn reconciled(id: &str, kinds: &[(TransitionKind, bool)]) -> SubscriberOutcome {
        let mut report = SubscriberReport::new(id);
        for (i, (kind, ok)) in kinds.iter().enumerate() {
            report.transitions.push(Transition {
                object_id: format!("AC{}", i),
                kind: *kind,
                outcome: if *ok {
                    Ok(())
                } else {
                    Err(TransitionError::Delete(StoreError::Timeout(1)))
                },
            });
        }
        SubscriberOutcome::Reconciled(report)
    }

    #[test]
    fn test_cycle_report_totals() {
        let report = CycleReport {
            snapshot_size: 40,
            source: SnapshotSource::Fresh,
            subscribers: vec![
                reconciled("u1", &[(TransitionKind::Enter, true), (TransitionKind::Exit, true)]),
                reconciled("u2", &[(TransitionKind::Exit, false)]),
                SubscriberOutcome::LoadFailed {
                    subscriber_id: "u3".to_string(),
                    error: StoreError::Unavailable("down".to_string()),
                },
            ],
            duration: Duration::from_millis(1500),
        };

        assert_eq!(report.entered(), 1);
        assert_eq!(report.exited(), 1);
        assert_eq!(report.skipped_subscribers(), 1);
        assert_eq!(report.failures(), 2);
        assert_eq!(report.subscribers[2].subscriber_id(), "u3");
        assert_eq!(
            report.to_string(),
            "40 objects, 3 subscribers: 1 entered, 1 exited, 2 failures (1.5s)"
        );
    }

    #[test]
    fn test_skipped_display() {
        let outcome = CycleOutcome::Skipped(SkipReason::Feed(FeedError::Timeout(30)));
        assert!(!outcome.is_completed());
        assert_eq!(
            outcome.to_string(),
            "cycle skipped: feed unavailable: Feed request timed out after 30s"
        );
    }
}
