//! Link state-change events and observers
//!
//! Links report flag transitions synchronously to registered observers.
//! The engine imposes no transport; consumers forward events to whatever
//! channel their frontend uses.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Events emitted by a link when one of its flags actually changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LinkEvent {
    /// The enabled flag changed
    #[serde(rename_all = "camelCase")]
    EnabledChanged { enabled: bool },

    /// The dynamic-enabled flag changed
    #[serde(rename_all = "camelCase")]
    DynamicEnabledChanged { enabled: bool },
}

/// Trait for receiving link events
///
/// Observers are invoked synchronously, in subscription order, at the
/// point of the state transition.
pub trait LinkObserver: Send + Sync {
    /// Called once per actual flag transition
    fn notify(&self, event: &LinkEvent);
}

impl<F> LinkObserver for F
where
    F: Fn(&LinkEvent) + Send + Sync,
{
    fn notify(&self, event: &LinkEvent) {
        self(event)
    }
}

/// An observer that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl LinkObserver for NullObserver {
    fn notify(&self, _event: &LinkEvent) {}
}

/// An observer that records events for later inspection
///
/// Useful for testing to verify which notifications a link emitted.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LinkEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events seen so far
    pub fn events(&self) -> Vec<LinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear()
    }
}

impl LinkObserver for RecordingObserver {
    fn notify(&self, event: &LinkEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
