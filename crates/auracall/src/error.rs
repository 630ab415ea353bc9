//! Error types for the AuraCall service

use auracall_carrier_core::{CarrierError, PlacementError};
use auracall_session_core::SessionError;
use thiserror::Error;

/// Result type for AuraCall operations
pub type AuraCallResult<T> = Result<T, AuraCallError>;

/// Errors that can occur in the AuraCall service
#[derive(Debug, Error)]
pub enum AuraCallError {
    /// Session-core error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Carrier-core error
    #[error("Carrier error: {0}")]
    Carrier(#[from] CarrierError),

    /// Rejected call placement
    #[error("Call placement rejected: {0}")]
    Placement(#[from] PlacementError),

    /// Logging or other shared infrastructure error
    #[error("Infrastructure error: {0}")]
    Infra(#[from] auracall_infra_common::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Operation not valid in the service's current lifecycle state
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// An inbound channel has no consumer left
    #[error("Channel closed: {channel}")]
    ChannelClosed { channel: &'static str },
}

impl AuraCallError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
