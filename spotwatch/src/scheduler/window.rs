//! Sleep window state machine.

use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

/// Default hour at which polling is suspended.
pub const DEFAULT_SLEEP_AT: u32 = 23;

/// Default hour at which polling resumes.
pub const DEFAULT_WAKE_AT: u32 = 6;

/// Invalid scheduler configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{field} must be an hour between 0 and 23, got {value}")]
    InvalidHour { field: &'static str, value: u32 },

    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

/// Whether the scheduler should poll at a given hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Active,
    Sleeping,
}

/// A daily local-clock range during which polling is suspended.
///
/// `sleep_at > wake_at` wraps midnight (23 → 6 sleeps overnight).
/// `sleep_at < wake_at` sleeps within one day. Equal hours never sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepWindow {
    sleep_at: u32,
    wake_at: u32,
}

impl SleepWindow {
    pub fn new(sleep_at: u32, wake_at: u32) -> Result<Self, ScheduleError> {
        check_hour("sleep_at", sleep_at)?;
        check_hour("wake_at", wake_at)?;
        Ok(Self { sleep_at, wake_at })
    }

    /// A window that never sleeps.
    pub fn always_active() -> Self {
        Self {
            sleep_at: 0,
            wake_at: 0,
        }
    }

    pub fn sleep_at(&self) -> u32 {
        self.sleep_at
    }

    pub fn wake_at(&self) -> u32 {
        self.wake_at
    }

    pub fn is_disabled(&self) -> bool {
        self.sleep_at == self.wake_at
    }

    pub fn state_at(&self, hour: u32) -> ScheduleState {
        let sleeping = if self.sleep_at < self.wake_at {
            hour >= self.sleep_at && hour < self.wake_at
        } else if self.sleep_at > self.wake_at {
            hour >= self.sleep_at || hour < self.wake_at
        } else {
            false
        };

        if sleeping {
            ScheduleState::Sleeping
        } else {
            ScheduleState::Active
        }
    }

    /// Next wake boundary strictly after `now`, or `None` while active.
    pub fn next_wake(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.state_at(now.hour()) == ScheduleState::Active {
            return None;
        }
        let today = now.date().and_hms_opt(self.wake_at, 0, 0)?;
        if today > now {
            Some(today)
        } else {
            now.date().succ_opt()?.and_hms_opt(self.wake_at, 0, 0)
        }
    }
}

impl Default for SleepWindow {
    fn default() -> Self {
        Self {
            sleep_at: DEFAULT_SLEEP_AT,
            wake_at: DEFAULT_WAKE_AT,
        }
    }
}

fn check_hour(field: &'static str, value: u32) -> Result<(), ScheduleError> {
    if value > 23 {
        return Err(ScheduleError::InvalidHour { field, value });
    }
    Ok(())
}
