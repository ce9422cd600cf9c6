//! Event records.
//!
//! An event is created once per `publish` call and shared by reference
//! between every observer it reaches and the namespace's event log.

use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// An event as stored in the log and handed to observers.
pub type SharedEvent<T> = Arc<Event<T>>;

/// An immutable published event.
#[derive(Debug, Serialize)]
pub struct Event<T> {
    /// Payload provided by the publisher.
    pub data: T,
    /// Wall-clock instant at which the bus accepted the publish call.
    pub timestamp: SystemTime,
}

impl<T> Event<T> {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: SystemTime::now(),
        }
    }

    /// Get the payload.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Milliseconds since the Unix epoch, or 0 for clocks set before it.
    #[must_use]
    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let before = SystemTime::now();
        let event = Event::new("hello");
        let after = SystemTime::now();

        assert_eq!(*event.data(), "hello");
        assert!(event.timestamp >= before);
        assert!(event.timestamp <= after);
    }

    #[test]
    fn test_timestamp_millis() {
        let event = Event::new(1u8);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        assert!(event.timestamp_millis() > 0);
        assert!(event.timestamp_millis() <= now);
    }

    #[test]
    fn test_event_serializes_payload() {
        let event = Event::new(serde_json::json!({ "text": "hi" }));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["data"]["text"], "hi");
        assert!(value.get("timestamp").is_some());
    }
}
