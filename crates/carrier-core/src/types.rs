//! Carrier, SIM and placement types

use serde::{Deserialize, Serialize};

/// SIM card state, mapped from the platform's global SIM state
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimState {
    Ready,
    Absent,
    LockedPin,
    LockedPuk,
    LockedNetwork,
    Unknown,
}

impl SimState {
    /// Map a platform SIM state code
    pub fn from_platform_code(code: i32) -> Self {
        match code {
            1 => SimState::Absent,
            2 => SimState::LockedPin,
            3 => SimState::LockedPuk,
            4 => SimState::LockedNetwork,
            5 => SimState::Ready,
            _ => SimState::Unknown,
        }
    }
}

/// Network registration state
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkState {
    InService,
    OutOfService,
    EmergencyOnly,
    PowerOff,
    Unknown,
}

impl NetworkState {
    /// Map a platform service state code. No service state at all means
    /// the radio is not registered.
    pub fn from_platform_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => NetworkState::InService,
            Some(1) | None => NetworkState::OutOfService,
            Some(2) => NetworkState::EmergencyOnly,
            Some(3) => NetworkState::PowerOff,
            Some(_) => NetworkState::Unknown,
        }
    }
}

/// One active subscription as listed by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub subscription_id: i32,
    pub slot_index: i32,
    pub carrier_name: Option<String>,
    pub number: Option<String>,
    pub country_iso: Option<String>,
}

/// Opaque platform account handle able to place calls
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountHandle {
    pub id: String,
}

impl AccountHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Carrier snapshot entry handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_state: Option<SimState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_state: Option<NetworkState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<i32>,
    /// Set only on the entry produced when the subscription listing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CarrierInfo {
    /// Entry used when no subscription is active
    pub fn without_subscription(carrier_name: impl Into<String>) -> Self {
        Self {
            carrier_name: Some(carrier_name.into()),
            sim_state: Some(SimState::Unknown),
            network_state: Some(NetworkState::Unknown),
            ..Self::default()
        }
    }

    /// Entry used when the subscription listing failed
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementOutcome {
    CallStarted,
}

impl PlacementOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementOutcome::CallStarted => "CALL_STARTED",
        }
    }
}

/// Result of [`crate::CallPlacer::ensure_default_provider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefaultProviderStatus {
    /// Nothing to do
    AlreadyDefault,
    /// The platform was asked to prompt the user
    Requested,
}

impl DefaultProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultProviderStatus::AlreadyDefault => "ALREADY_DEFAULT",
            DefaultProviderStatus::Requested => "REQUESTED",
        }
    }
}

/// Platform notification that SIM or service state may have changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    CardStateChanged,
    ApplicationStateChanged,
    ServiceStateChanged,
}
