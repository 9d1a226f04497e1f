//! Domain model shared by the feed, the stores and the reconciliation engine.

mod aircraft;
mod subscriber;

pub use aircraft::{Altitude, TrackedObject};
pub use subscriber::{Subscriber, TrackedSpot};
