//! Poll scheduling.
//!
//! [`PollScheduler`] drives a [`PollCycle`] once per interval, suspending
//! polling inside a daily [`SleepWindow`]. One cycle runs at a time; a slow
//! cycle delays the next tick rather than stacking ticks up.
//!
//! ```text
//!            tick                 tick      sleep_at            wake_at   tick
//!   ──────────┼── cycle ───────────┼── cycle ──┼─── suspended ─────┼─ cycle ─┼──►
//!   |<- interval ->|               |<- interval ->|
//! ```
//!
//! The first cycle runs one interval after start. Cancellation is checked
//! before every wait.

mod clock;
mod window;

pub use clock::{Clock, SystemClock};
pub use window::{ScheduleError, ScheduleState, SleepWindow, DEFAULT_SLEEP_AT, DEFAULT_WAKE_AT};

use std::time::Duration;

use chrono::Timelike;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cycle::{CycleOutcome, PollCycle};

/// Default poll interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 190;

/// Interval-plus-sleep-window poll loop.
pub struct PollScheduler<C: Clock = SystemClock> {
    interval: Duration,
    window: SleepWindow,
    clock: C,
}

impl PollScheduler<SystemClock> {
    /// Creates a scheduler on the system clock.
    pub fn new(interval: Duration, window: SleepWindow) -> Result<Self, ScheduleError> {
        if interval.is_zero() {
            return Err(ScheduleError::ZeroInterval);
        }
        Ok(Self {
            interval,
            window,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> PollScheduler<C> {
    /// Replaces the wall clock used for sleep window checks.
    pub fn with_clock<D: Clock>(self, clock: D) -> PollScheduler<D> {
        PollScheduler {
            interval: self.interval,
            window: self.window,
            clock,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn window(&self) -> SleepWindow {
        self.window
    }

    pub fn state(&self) -> ScheduleState {
        self.window.state_at(self.clock.now().hour())
    }

    /// Runs cycles until `shutdown` is cancelled. Returns the number of
    /// cycles run.
    pub async fn run(&self, target: &dyn PollCycle, shutdown: CancellationToken) -> u64 {
        info!(
            interval_secs = self.interval.as_secs(),
            sleep_at = self.window.sleep_at(),
            wake_at = self.window.wake_at(),
            "Poll scheduler starting"
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut state = ScheduleState::Active;
        let mut cycles = 0u64;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                _ = ticker.tick() => {}
            }

            if !self.sleep_through_window(&mut state, &shutdown).await {
                break;
            }
            if state == ScheduleState::Sleeping {
                info!(wake_at = self.window.wake_at(), "Wake hour reached, polling resumed");
                state = ScheduleState::Active;
                ticker.reset();
            }

            let outcome = target.run_cycle().await;
            cycles += 1;
            match &outcome {
                CycleOutcome::Completed(report) => {
                    debug!(cycle = cycles, summary = %report, "Cycle finished");
                }
                CycleOutcome::Skipped(reason) => {
                    info!(cycle = cycles, reason = %reason, "Cycle skipped");
                }
            }
        }

        info!(cycles, "Poll scheduler stopped");
        cycles
    }

    /// Blocks while the clock is inside the sleep window. Returns false if
    /// cancelled while waiting.
    async fn sleep_through_window(
        &self,
        state: &mut ScheduleState,
        shutdown: &CancellationToken,
    ) -> bool {
        loop {
            let now = self.clock.now();
            if self.window.state_at(now.hour()) == ScheduleState::Active {
                return true;
            }

            if *state == ScheduleState::Active {
                info!(sleep_at = self.window.sleep_at(), "Sleep hour reached, polling suspended");
                *state = ScheduleState::Sleeping;
            }

            let wait = match self.window.next_wake(now) {
                Some(wake) => (wake - now).to_std().unwrap_or(self.interval),
                None => self.interval,
            };
            debug!(wait_secs = wait.as_secs(), "Sleeping until wake hour");

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => return false,

                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}
