//! Geofence reconciliation.
//!
//! For one subscriber, compares the objects currently inside the zone with
//! the spots persisted on a previous cycle and produces enter/exit
//! transitions:
//!
//! ```text
//!   in zone now   persisted   action
//!   ───────────   ─────────   ───────────────────────────────
//!   yes           no          enter: create spot, then notify
//!   no            yes         exit: delete spot
//!   yes           yes         nothing
//! ```
//!
//! Planning ([`plan_transitions`]) is pure. Applying the plan
//! ([`Reconciler`]) performs the store and notifier calls and reports one
//! outcome per transition in a [`SubscriberReport`].

mod engine;
mod plan;
mod report;

pub use engine::{Reconciler, DEFAULT_NOTIFY_TIMEOUT, DEFAULT_STORE_TIMEOUT};
pub use plan::{plan_transitions, ExclusionPolicy, PlannedEnter, ReconcilePlan, DEFAULT_GROUND_MARKER};
pub use report::{SubscriberReport, Transition, TransitionError, TransitionKind};
