//! SpotWatch - geofenced alerts for live military aircraft.
//!
//! Polls an ADS-B feed on a fixed interval, works out for every registered
//! subscriber which aircraft entered or left their circular watch zone
//! since the previous poll, persists that membership, and sends one push
//! notification per aircraft that entered.
//!
//! # Layout
//!
//! - [`geo`], [`zone`]: great-circle distance and zone membership
//! - [`feed`]: live snapshot source (ADS-B Exchange)
//! - [`store`]: subscribers and persisted spots
//! - [`notify`]: push delivery
//! - [`reconcile`]: per-subscriber enter/exit engine
//! - [`cycle`], [`scheduler`]: one poll cycle, and the loop driving it
//! - [`config`], [`logging`], [`app`]: ambient setup

pub mod app;
pub mod config;
pub mod cycle;
pub mod feed;
pub mod geo;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reconcile;
pub mod scheduler;
pub mod store;
pub mod zone;

mod deadline;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
