//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`RevisionEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use atelier_core::asset::AssetId;
use atelier_core::types::{RequestId, Timestamp};
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// RevisionEvent
// ---------------------------------------------------------------------------

/// A lifecycle transition inside the revision engine.
///
/// Constructed via [`RevisionEvent::new`] and enriched with
/// [`for_asset`](RevisionEvent::for_asset),
/// [`with_request`](RevisionEvent::with_request), and
/// [`with_payload`](RevisionEvent::with_payload).
#[derive(Debug, Clone, Serialize)]
pub struct RevisionEvent {
    /// Dot-separated event name, e.g. `"draft.promoted"`.
    /// See `atelier_core::revision_events`.
    pub event_type: String,

    /// Asset identity the event concerns, if any.
    pub asset_id: Option<AssetId>,

    /// Revision request the event concerns, if any.
    pub request_id: Option<RequestId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: Timestamp,
}

impl RevisionEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            asset_id: None,
            request_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn for_asset(mut self, asset_id: &AssetId) -> Self {
        self.asset_id = Some(asset_id.clone());
        self
    }

    pub fn with_request(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use atelier_events::bus::{EventBus, RevisionEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(RevisionEvent::new("asset.ingested"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<RevisionEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no active subscribers the event is dropped.
    pub fn publish(&self, event: RevisionEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RevisionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
