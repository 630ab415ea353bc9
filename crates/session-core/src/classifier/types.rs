use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw call state as reported by the platform telephony stack
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawCallState {
    #[default]
    Idle,
    Ringing,
    OffHook,
}

impl RawCallState {
    /// Name used in emitted events
    pub fn name(&self) -> &'static str {
        match self {
            RawCallState::Idle => "IDLE",
            RawCallState::Ringing => "RINGING",
            RawCallState::OffHook => "OFFHOOK",
        }
    }
}

impl TryFrom<i32> for RawCallState {
    type Error = i32;

    /// Platform codes: 0 idle, 1 ringing, 2 off-hook
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RawCallState::Idle),
            1 => Ok(RawCallState::Ringing),
            2 => Ok(RawCallState::OffHook),
            other => Err(other),
        }
    }
}

/// Semantic meaning derived from a raw state change
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DerivedDirection {
    Incoming,
    Outgoing,
    Answered,
    Ended,
    Idle,
    Unknown,
}

impl DerivedDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedDirection::Incoming => "INCOMING",
            DerivedDirection::Outgoing => "OUTGOING",
            DerivedDirection::Answered => "ANSWERED",
            DerivedDirection::Ended => "ENDED",
            DerivedDirection::Idle => "IDLE",
            DerivedDirection::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DerivedDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification from the platform telephony signal stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelephonySignal {
    /// A decoded raw state
    State {
        state: RawCallState,
        number: Option<String>,
    },
    /// An integer code as delivered by the platform
    Code { code: i32, number: Option<String> },
}

impl TelephonySignal {
    pub fn state(state: RawCallState, number: Option<&str>) -> Self {
        TelephonySignal::State {
            state,
            number: number.map(str::to_string),
        }
    }

    pub fn code(code: i32, number: Option<&str>) -> Self {
        TelephonySignal::Code {
            code,
            number: number.map(str::to_string),
        }
    }
}

/// Event emitted for every classified signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStateChanged {
    /// Raw state name (`IDLE`, `RINGING`, `OFFHOOK` or `UNKNOWN`)
    pub state: String,
    /// Remote number; empty when the platform did not supply one
    pub number: String,
    pub direction: DerivedDirection,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Mutable record behind the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub last_raw_state: RawCallState,
    pub call_started_at: Option<DateTime<Utc>>,
    /// Set on the first ring and never cleared
    pub is_incoming: bool,
}
