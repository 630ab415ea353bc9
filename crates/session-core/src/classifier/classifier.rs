use super::types::{
    CallStateChanged, ClassifierState, DerivedDirection, RawCallState, TelephonySignal,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Destination for classified events
pub trait CallStateSink: Send + Sync {
    fn deliver(&self, event: CallStateChanged);
}

impl CallStateSink for broadcast::Sender<CallStateChanged> {
    fn deliver(&self, event: CallStateChanged) {
        // No receivers is fine
        let _ = self.send(event);
    }
}

impl CallStateSink for mpsc::UnboundedSender<CallStateChanged> {
    fn deliver(&self, event: CallStateChanged) {
        if self.send(event).is_err() {
            debug!("Call state receiver dropped");
        }
    }
}

/// Turns raw platform call-state notifications into semantic events.
///
/// The direction of each event depends on the previous raw state, so
/// signals must be fed in delivery order. Reading the previous state,
/// deriving the direction and storing the new state happen under one lock.
#[derive(Debug, Default)]
pub struct SignalClassifier {
    state: Mutex<ClassifierState>,
}

impl SignalClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a decoded raw state at the current time
    pub fn classify(&self, state: RawCallState, number: Option<&str>) -> CallStateChanged {
        self.classify_at(state, number, Utc::now())
    }

    /// Classify a decoded raw state at `now`
    pub fn classify_at(
        &self,
        new_state: RawCallState,
        number: Option<&str>,
        now: DateTime<Utc>,
    ) -> CallStateChanged {
        let direction = {
            let mut record = self.state.lock();
            let direction = match (record.last_raw_state, new_state) {
                (_, RawCallState::Ringing) => {
                    record.is_incoming = true;
                    record.call_started_at = Some(now);
                    DerivedDirection::Incoming
                }
                (RawCallState::Ringing, RawCallState::OffHook) => {
                    record.call_started_at = Some(now);
                    DerivedDirection::Answered
                }
                (_, RawCallState::OffHook) => {
                    record.call_started_at = Some(now);
                    DerivedDirection::Outgoing
                }
                (RawCallState::OffHook | RawCallState::Ringing, RawCallState::Idle) => {
                    DerivedDirection::Ended
                }
                (RawCallState::Idle, RawCallState::Idle) => DerivedDirection::Idle,
            };
            record.last_raw_state = new_state;
            direction
        };

        debug!("Call state {} -> {}", new_state.name(), direction);
        CallStateChanged {
            state: new_state.name().to_string(),
            number: number.unwrap_or_default().to_string(),
            direction,
            timestamp: now,
        }
    }

    /// Classify a platform integer code. Unknown codes produce an `UNKNOWN`
    /// event and leave the classifier state untouched.
    pub fn classify_code(&self, code: i32, number: Option<&str>) -> CallStateChanged {
        match RawCallState::try_from(code) {
            Ok(state) => self.classify(state, number),
            Err(code) => {
                warn!("Unrecognized call state code {}", code);
                CallStateChanged {
                    state: "UNKNOWN".to_string(),
                    number: number.unwrap_or_default().to_string(),
                    direction: DerivedDirection::Unknown,
                    timestamp: Utc::now(),
                }
            }
        }
    }

    pub fn handle(&self, signal: &TelephonySignal) -> CallStateChanged {
        match signal {
            TelephonySignal::State { state, number } => self.classify(*state, number.as_deref()),
            TelephonySignal::Code { code, number } => self.classify_code(*code, number.as_deref()),
        }
    }

    /// Copy of the current record
    pub fn snapshot(&self) -> ClassifierState {
        self.state.lock().clone()
    }

    /// Drain `signals` in order, delivering one event per signal, until the
    /// channel closes.
    pub async fn run<S: CallStateSink>(
        self: Arc<Self>,
        mut signals: mpsc::Receiver<TelephonySignal>,
        sink: S,
    ) {
        info!("Signal classifier started");
        while let Some(signal) = signals.recv().await {
            sink.deliver(self.handle(&signal));
        }
        info!("Signal classifier stopped");
    }
}
