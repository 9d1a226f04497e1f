//! Per-subscriber reconciliation results.

use std::fmt;

use thiserror::Error;

use crate::notify::NotifyError;
use crate::store::StoreError;

/// Direction of a zone membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Enter,
    Exit,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Enter => f.write_str("enter"),
            TransitionKind::Exit => f.write_str("exit"),
        }
    }
}

/// Why a single transition's effect did not fully apply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    /// The exit's spot could not be deleted.
    #[error("delete_spot failed: {0}")]
    Delete(StoreError),

    /// The enter's spot could not be created; no notification was sent.
    #[error("create_spot failed: {0}")]
    Create(StoreError),

    /// The spot was created but the notification was not delivered.
    #[error("notify failed: {0}")]
    Notify(NotifyError),
}

impl TransitionError {
    /// Name of the collaborator call that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            TransitionError::Delete(_) => "delete_spot",
            TransitionError::Create(_) => "create_spot",
            TransitionError::Notify(_) => "notify",
        }
    }
}

/// Outcome of one enter or exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub object_id: String,
    pub kind: TransitionKind,
    pub outcome: Result<(), TransitionError>,
}

impl Transition {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything that happened while reconciling one subscriber in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberReport {
    pub subscriber_id: String,
    /// Exits first (persisted order), then enters (snapshot order).
    pub transitions: Vec<Transition>,
    /// Objects in the zone filtered out by the exclusion policy.
    pub excluded: usize,
    /// Objects already tracked and still in the zone.
    pub retained: usize,
}

impl SubscriberReport {
    pub fn new(subscriber_id: impl Into<String>) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            transitions: Vec::new(),
            excluded: 0,
            retained: 0,
        }
    }

    fn count(&self, kind: TransitionKind) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.kind == kind && t.is_ok())
            .count()
    }

    /// Enters whose spot was created and notification delivered.
    pub fn entered(&self) -> usize {
        self.count(TransitionKind::Enter)
    }

    /// Exits whose spot was deleted.
    pub fn exited(&self) -> usize {
        self.count(TransitionKind::Exit)
    }

    /// Transitions that failed in any way.
    pub fn failures(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(|t| !t.is_ok())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// True when nothing changed and nothing failed.
    pub fn is_quiet(&self) -> bool {
        self.transitions.is_empty()
    }
}
