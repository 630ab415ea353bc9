//! Session event system
//!
//! Lifecycle notifications for the presentation layer, published through a
//! `tokio::sync::broadcast` channel. Publishing never blocks and never fails:
//! with no subscribers the event is dropped.

use crate::types::{CallDirection, CallState, DisconnectCause};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default buffer for the session event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Events published by call sessions and the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A session was created and registered
    SessionCreated {
        key: String,
        direction: CallDirection,
        state: CallState,
    },

    /// A session changed state
    StateChanged {
        key: String,
        old_state: CallState,
        new_state: CallState,
    },

    /// A session was torn down and has left the registry. Not published by
    /// a session whose key was taken over by a replacement.
    SessionFinished {
        key: String,
        cause: DisconnectCause,
    },

    /// The last registered session was removed
    AllCallsEnded,
}

/// Cloneable handle for publishing [`SessionEvent`]s
#[derive(Debug, Clone)]
pub struct SessionEventPublisher {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventPublisher {
    /// Create a publisher with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event
    pub fn publish(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionEventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
