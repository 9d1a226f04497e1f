//! Application bootstrap and lifecycle.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      SpotWatchApp                          │
//! │                                                            │
//! │  PollScheduler ──► CycleRunner ──► Reconciler              │
//! │                      │   │            │      │             │
//! │           AdsbExchangeFeed   JsonSpotStore   Notifier      │
//! │                      │                 (webhook or log)    │
//! │            JsonSubscriberDirectory                         │
//! └───────────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::SpotWatchApp;
pub use config::AppConfig;
pub use error::AppError;
