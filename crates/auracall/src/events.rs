//! Bridge events
//!
//! Everything the presentation layer hears about goes out as a
//! [`BridgeEvent`] with a stable event name and a JSON payload in the shape
//! the scripting bridge expects.

use auracall_carrier_core::{CarrierError, CarrierInfo, CarrierSink, PlacementError};
use auracall_session_core::{CallStateChanged, CallStateSink, DisconnectCause};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Events delivered to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A classified telephony signal
    CallStateChanged(CallStateChanged),
    /// A fresh carrier snapshot
    CarrierUpdated(Vec<CarrierInfo>),
    /// A call session was torn down
    CallFinished { key: String, cause: DisconnectCause },
    /// No call sessions remain; the in-call UI should close
    AllCallsEnded,
}

impl BridgeEvent {
    /// Event name on the bridge
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::CallStateChanged(_) => "CallStateChanged",
            BridgeEvent::CarrierUpdated(_) => "CarrierUpdated",
            BridgeEvent::CallFinished { .. } => "CallFinished",
            BridgeEvent::AllCallsEnded => "AllCallsEnded",
        }
    }

    /// Event payload. Call state changes travel as a one-element array and
    /// carrier snapshots as one element per SIM.
    pub fn payload(&self) -> serde_json::Result<Value> {
        match self {
            BridgeEvent::CallStateChanged(event) => {
                Ok(Value::Array(vec![serde_json::to_value(event)?]))
            }
            BridgeEvent::CarrierUpdated(snapshot) => serde_json::to_value(snapshot),
            BridgeEvent::CallFinished { key, cause } => Ok(json!({
                "key": key,
                "cause": cause.to_string(),
            })),
            BridgeEvent::AllCallsEnded => Ok(Value::Null),
        }
    }
}

/// Event stream type
pub type EventStream = BroadcastStream<BridgeEvent>;

/// Fan-out of bridge events to any number of subscribers
#[derive(Debug, Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn emit(&self, event: BridgeEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> EventStream {
        BroadcastStream::new(self.sender.subscribe())
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(auracall_session_core::events::DEFAULT_EVENT_CAPACITY)
    }
}

impl CallStateSink for EventEmitter {
    fn deliver(&self, event: CallStateChanged) {
        self.emit(BridgeEvent::CallStateChanged(event));
    }
}

impl CarrierSink for EventEmitter {
    fn deliver(&self, snapshot: Vec<CarrierInfo>) {
        self.emit(BridgeEvent::CarrierUpdated(snapshot));
    }
}

/// Structured refusal handed back across the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRejection {
    pub code: String,
    pub message: String,
}

impl BridgeRejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<PlacementError> for BridgeRejection {
    fn from(err: PlacementError) -> Self {
        Self::new(err.code.as_str(), err.message)
    }
}

impl From<CarrierError> for BridgeRejection {
    fn from(err: CarrierError) -> Self {
        Self::new("DEFAULT_PROVIDER_ERROR", err.to_string())
    }
}

impl std::fmt::Display for BridgeRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
