use std::sync::Arc;

use atelier_engine::RevisionEngine;
use atelier_events::{EventBus, EventLog};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already a shared handle.
#[derive(Clone)]
pub struct AppState {
    /// The revision engine (canonical collection, notes, drafts, requests).
    pub engine: RevisionEngine,
    pub config: Arc<ServerConfig>,
    /// Bus the engine publishes lifecycle events on.
    pub event_bus: Arc<EventBus>,
    /// Recent events, fed from `event_bus` by a background task.
    pub event_log: EventLog,
}
