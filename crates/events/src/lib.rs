//! Atelier event bus.
//!
//! - [`EventBus`] is the in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`RevisionEvent`] is the event envelope published by the revision
//!   engine at every lifecycle transition.
//! - [`EventLog`] is a background subscriber that keeps a bounded window of
//!   recent events for the activity feed.

pub mod bus;
pub mod log;

pub use bus::{EventBus, RevisionEvent};
pub use log::EventLog;
