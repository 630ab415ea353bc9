//! Error types for session-core
//!
//! Almost nothing in the lifecycle manager is an error from the caller's point
//! of view: commands against unknown or finished sessions are no-ops, and
//! platform failures are logged and degraded. The variants below cover the few
//! places where a value genuinely cannot be produced.

use auracall_infra_common::PlatformError;
use thiserror::Error;

/// Result type for session-core operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur in session-core
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session key was empty or otherwise unusable
    #[error("Invalid session key: {reason}")]
    InvalidKey { reason: String },

    /// A remote address could not be parsed
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A platform collaborator reported a failure
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SessionError {
    /// Create an invalid key error
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    /// Create an invalid address error
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
