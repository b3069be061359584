//! Event types for streaming batch progress
//!
//! Events are sent from the processor to any consumer (workflow host,
//! test harness) to report batch lifecycle and per-item failures. The
//! sink abstracts over the transport so the engine can be embedded in
//! different hosts.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Trait for sending batch events
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: BatchEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted during batch execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BatchEvent {
    /// Batch processing started
    #[serde(rename_all = "camelCase")]
    BatchStarted {
        execution_id: String,
        item_count: usize,
    },

    /// An item was transformed successfully
    #[serde(rename_all = "camelCase")]
    ItemCompleted {
        execution_id: String,
        index: usize,
    },

    /// An item failed
    #[serde(rename_all = "camelCase")]
    ItemFailed {
        execution_id: String,
        index: usize,
        kind: ErrorKind,
        error: String,
    },

    /// Batch processing finished (regardless of per-item failures)
    #[serde(rename_all = "camelCase")]
    BatchCompleted {
        execution_id: String,
        total: usize,
        successful: usize,
        failed: usize,
    },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: BatchEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<BatchEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<BatchEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: BatchEvent) -> Result<(), EventError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
