//! Recent-activity event log.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! keeps the most recent events in a bounded in-memory window. It runs as a
//! long-lived background task and stops when the bus is dropped or its
//! cancellation token fires.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use crate::bus::RevisionEvent;

/// Default number of events retained.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Bounded, shareable window of recent events. Cloning shares the window.
#[derive(Clone)]
pub struct EventLog {
    entries: Arc<RwLock<VecDeque<RevisionEvent>>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Run the recording loop until the channel closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<RevisionEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Event log shutting down");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => {
                        tracing::debug!(
                            event_type = %event.event_type,
                            asset_id = ?event.asset_id,
                            "Recorded revision event",
                        );
                        self.record(event).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Event log lagged, some events were not recorded");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, event log shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Append one event, evicting the oldest when full.
    pub async fn record(&self, event: RevisionEvent) {
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(event);
    }

    /// Up to `limit` most recent events, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<RevisionEvent> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
