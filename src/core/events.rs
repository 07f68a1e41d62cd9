//! Change notifications for record collections
//!
//! The HTTP layer publishes a [`RecordEvent`] after every successful status
//! change or deletion. Anything interested (audit log, live dashboard push)
//! subscribes to the [`EventBus`].
//!
//! ```text
//! status handler ──┐
//!                  ├──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! delete handler ──┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events related to record mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RecordEvent {
    /// A record moved to a new status
    StatusChanged {
        resource: String,
        id: String,
        from: String,
        to: String,
    },
    /// A record was removed from its collection
    Deleted { resource: String, id: String },
}

impl RecordEvent {
    pub fn resource(&self) -> &str {
        match self {
            RecordEvent::StatusChanged { resource, .. } | RecordEvent::Deleted { resource, .. } => {
                resource
            }
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            RecordEvent::StatusChanged { id, .. } | RecordEvent::Deleted { id, .. } => id,
        }
    }

    pub fn action(&self) -> &str {
        match self {
            RecordEvent::StatusChanged { .. } => "status_changed",
            RecordEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    pub event: RecordEvent,
}

impl EventEnvelope {
    pub fn new(event: RecordEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Receivers further than `capacity` events behind get `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never blocks and never fails; with no subscribers the event is dropped.
    /// Returns the number of receivers that will see it.
    pub fn publish(&self, event: RecordEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
