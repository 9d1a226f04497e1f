//! CLI command implementations.
//!
//! - [`run`] - Poll loop until Ctrl+C
//! - [`once`] - Single cycle with a printed report
//! - [`subscriber`] - Subscriber registry (add, list, remove)
//! - [`config`] - Configuration file (path, show, init)

pub mod common;
pub mod config;
pub mod once;
pub mod run;
pub mod subscriber;
