//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for
//! [`PlatformEvent`]s. It is shared via `Arc<EventBus>` across the
//! application; the parsing pipeline, event persistence, and any
//! future consumers each hold an independent receiver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// A template upload was registered and an upload token issued.
pub const TEMPLATE_REGISTERED: &str = "template.registered";

/// Upload bytes landed in storage; carries the storage path. The
/// parsing pipeline treats this as its trigger and must stay safe
/// under redelivery.
pub const TEMPLATE_UPLOAD_COMPLETED: &str = "template.upload_completed";

/// The parsing pipeline claimed the template and extraction started.
pub const TEMPLATE_PARSING: &str = "template.parsing";

/// Extraction finished and fields were persisted.
pub const TEMPLATE_PARSED: &str = "template.parsed";

/// Extraction failed terminally for this template.
pub const TEMPLATE_PARSE_FAILED: &str = "template.parse_failed";

/// An explicit re-parse request restarted the pipeline.
pub const TEMPLATE_REPARSE_REQUESTED: &str = "template.reparse_requested";

/// A client submitted intake data for a service.
pub const INTAKE_SUBMITTED: &str = "intake.submitted";

/// A generation run produced a new artifact.
pub const ARTIFACT_GENERATED: &str = "artifact.generated";

/// A customer submitted an override for review.
pub const OVERRIDE_SUBMITTED: &str = "override.submitted";

/// An override was approved by an admin.
pub const OVERRIDE_APPROVED: &str = "override.approved";

/// An override was rejected by an admin.
pub const OVERRIDE_REJECTED: &str = "override.rejected";

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`PlatformEvent::new`] and enriched with the builder
/// methods [`with_entity`](PlatformEvent::with_entity) and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"template.parsed"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"template"`, `"service"`).
    pub entity_type: Option<String>,

    /// Optional source entity public id.
    pub entity_id: Option<String>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: None,
            entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the source entity to the event.
    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// The storage path carried by an upload-completed event, if any.
    pub fn storage_path(&self) -> Option<&str> {
        self.payload.get("storage_path").and_then(|v| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`PlatformEvent`].
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: PlatformEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
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
