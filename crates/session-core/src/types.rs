//! Core types for session-core
//!
//! Identifiers, lifecycle states and the inbound connection request shared by
//! the registry, the call session state machine and the session factory.

use crate::errors::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a call session
///
/// `Initializing → {Dialing | Ringing} → Active ⇄ Held → Disconnected`.
/// `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    /// Session object exists but the platform has not been told anything yet
    Initializing,
    /// Outgoing call is being placed
    Dialing,
    /// Incoming call is alerting
    Ringing,
    /// Call is connected
    Active,
    /// Call is on hold
    Held,
    /// Call has ended; no further transitions are accepted
    Disconnected,
}

impl CallState {
    /// All states, in lifecycle order
    pub const ALL: [CallState; 6] = [
        CallState::Initializing,
        CallState::Dialing,
        CallState::Ringing,
        CallState::Active,
        CallState::Held,
        CallState::Disconnected,
    ];

    /// Whether this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Disconnected)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Initializing => "Initializing",
            CallState::Dialing => "Dialing",
            CallState::Ringing => "Ringing",
            CallState::Active => "Active",
            CallState::Held => "Held",
            CallState::Disconnected => "Disconnected",
        };
        f.write_str(name)
    }
}

/// Direction of a call session, fixed at creation
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallDirection {
    Outgoing,
    Incoming,
    Unknown,
}

/// Reason recorded when a session enters `Disconnected`
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisconnectCause {
    /// Local user hung up
    Local,
    /// Remote party hung up
    Remote,
    /// Incoming call was rejected
    Rejected,
    /// Call was aborted before it was established
    Canceled,
    /// No specific reason
    Unspecified,
}

impl fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisconnectCause::Local => "local",
            DisconnectCause::Remote => "remote",
            DisconnectCause::Rejected => "rejected",
            DisconnectCause::Canceled => "canceled",
            DisconnectCause::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

/// Remote party address as delivered by the call-routing collaborator,
/// e.g. `tel:+15551234` or `sip:bob@example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAddress {
    /// URI scheme, lowercased (`tel`, `sip`, ...)
    pub scheme: String,
    /// Everything between the scheme separator and the fragment
    pub scheme_specific_part: String,
    /// The address exactly as received
    pub raw: String,
}

impl RemoteAddress {
    /// Parse an address URI.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let url = url::Url::parse(trimmed)
            .map_err(|e| SessionError::invalid_address(raw, e.to_string()))?;

        // `Url` percent-encodes the path, so the scheme-specific part is taken
        // from the original text instead.
        let after_scheme = match trimmed.find(':') {
            Some(idx) => &trimmed[idx + 1..],
            None => return Err(SessionError::invalid_address(raw, "missing scheme")),
        };
        let scheme_specific_part = after_scheme
            .split('#')
            .next()
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            scheme: url.scheme().to_string(),
            scheme_specific_part,
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extra key under which the call-routing collaborator passes an explicit
/// call identifier.
pub const CALL_ID_EXTRA: &str = "CALL_ID";

/// Request from the call-routing collaborator to create a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    /// Explicit call identifier (the `CALL_ID` extra), if any
    pub explicit_id: Option<String>,
    /// Remote address URI, if any
    pub address: Option<String>,
    /// Routing account the platform selected for this call
    pub account_id: Option<String>,
}

impl ConnectionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_explicit_id(mut self, id: impl Into<String>) -> Self {
        self.explicit_id = Some(id.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }
}
