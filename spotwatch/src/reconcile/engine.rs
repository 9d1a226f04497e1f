//! Applies a reconciliation plan through the injected store and notifier.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::plan::{plan_transitions, ExclusionPolicy, PlannedEnter, ReconcilePlan};
use super::report::{SubscriberReport, Transition, TransitionError, TransitionKind};
use crate::deadline::with_deadline;
use crate::model::{Subscriber, TrackedObject, TrackedSpot};
use crate::notify::{Notifier, NotifyError};
use crate::store::{SpotStore, StoreError};

/// Default deadline for a single store mutation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for a single notification.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// The geofence reconciliation engine.
///
/// Given one subscriber's in-zone objects and persisted spots, deletes the
/// spots that exited, creates spots for objects that entered, and sends one
/// notification per successfully created spot. It never reads the feed or
/// the clock; its only effects go through the injected [`SpotStore`] and
/// [`Notifier`].
///
/// Effects are applied one at a time: exits first, then enters. A failing
/// effect is recorded in the report and processing continues with the next
/// transition. Nothing is rolled back or retried.
pub struct Reconciler {
    store: Arc<dyn SpotStore>,
    notifier: Arc<dyn Notifier>,
    policy: ExclusionPolicy,
    store_timeout: Duration,
    notify_timeout: Duration,
}

impl Reconciler {
    pub fn new(store: Arc<dyn SpotStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            policy: ExclusionPolicy::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    /// Reconciles one subscriber.
    ///
    /// # Arguments
    ///
    /// * `subscriber` - The subscriber being reconciled
    /// * `current` - Zone filter output for this cycle
    /// * `persisted` - All spots currently stored for this subscriber
    pub async fn reconcile(
        &self,
        subscriber: &Subscriber,
        current: &[&TrackedObject],
        persisted: &[TrackedSpot],
    ) -> SubscriberReport {
        let plan = plan_transitions(&subscriber.id, current, persisted, &self.policy);
        for object in plan.entering(current) {
            debug!(subscriber_id = %subscriber.id, object = %object, "Object entering zone");
        }
        self.apply(subscriber, plan).await
    }

    /// Applies a precomputed plan.
    pub async fn apply(&self, subscriber: &Subscriber, plan: ReconcilePlan) -> SubscriberReport {
        let mut report = SubscriberReport::new(subscriber.id.clone());
        report.excluded = plan.excluded.len();
        report.retained = plan.retained;

        if !plan.excluded.is_empty() {
            debug!(
                subscriber_id = %subscriber.id,
                excluded = ?plan.excluded,
                marker = %self.policy.marker(),
                "Ignoring ground-marked objects"
            );
        }

        for spot in &plan.exits {
            let outcome = self.apply_exit(subscriber, spot).await;
            report.transitions.push(Transition {
                object_id: spot.object_id.clone(),
                kind: TransitionKind::Exit,
                outcome,
            });
        }

        for enter in &plan.enters {
            let outcome = self.apply_enter(subscriber, enter).await;
            report.transitions.push(Transition {
                object_id: enter.spot.object_id.clone(),
                kind: TransitionKind::Enter,
                outcome,
            });
        }

        report
    }

    async fn apply_exit(
        &self,
        subscriber: &Subscriber,
        spot: &TrackedSpot,
    ) -> Result<(), TransitionError> {
        let result = with_deadline(
            self.store_timeout,
            self.store.delete_spot(&subscriber.id, &spot.object_id),
            StoreError::Timeout,
        )
        .await;

        match result {
            Ok(()) => {
                debug!(
                    subscriber_id = %subscriber.id,
                    object_id = %spot.object_id,
                    "Object left zone"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    subscriber_id = %subscriber.id,
                    object_id = %spot.object_id,
                    operation = "delete_spot",
                    error = %e,
                    "Failed to remove exited spot"
                );
                Err(TransitionError::Delete(e))
            }
        }
    }

    async fn apply_enter(
        &self,
        subscriber: &Subscriber,
        enter: &PlannedEnter,
    ) -> Result<(), TransitionError> {
        let spot = &enter.spot;

        if let Err(e) = with_deadline(
            self.store_timeout,
            self.store.create_spot(spot),
            StoreError::Timeout,
        )
        .await
        {
            // Without a persisted spot the next cycle sees this enter again
            // and notifies then.
            warn!(
                subscriber_id = %subscriber.id,
                object_id = %spot.object_id,
                operation = "create_spot",
                error = %e,
                "Failed to persist entered spot; notification deferred"
            );
            return Err(TransitionError::Create(e));
        }

        let delivered = with_deadline(
            self.notify_timeout,
            self.notifier.notify(subscriber, &enter.notification),
            NotifyError::Timeout,
        )
        .await;

        match delivered {
            Ok(()) => {
                info!(
                    subscriber_id = %subscriber.id,
                    object_id = %spot.object_id,
                    title = %enter.notification.title,
                    body = %enter.notification.body,
                    "Object entered zone; subscriber notified"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    subscriber_id = %subscriber.id,
                    object_id = %spot.object_id,
                    operation = "notify",
                    error = %e,
                    "Failed to deliver notification"
                );
                Err(TransitionError::Notify(e))
            }
        }
    }
}
