//! Error types for carrier-core

use auracall_infra_common::PlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for carrier-core operations
pub type CarrierResult<T> = Result<T, CarrierError>;

/// Errors that can occur in carrier-core
#[derive(Debug, Error)]
pub enum CarrierError {
    /// A telephony collaborator reported a failure
    #[error("Carrier platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A platform service the operation needs is missing
    #[error("Service unavailable: {service}")]
    Unavailable { service: String },
}

impl CarrierError {
    /// Create a service unavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
        }
    }
}

/// Stable reason code attached to a rejected call placement
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionCode {
    /// The app lacks the calling privilege
    PermissionDenied,
    /// The platform is too old to place calls on a chosen SIM
    Unsupported,
    /// The call-routing service is not available
    SystemError,
    /// The app is not the default call-routing provider
    NotDefaultProvider,
    /// No account handle could be resolved for the requested slot
    SimNotFound,
    /// The platform refused the placement
    CallError,
}

impl RejectionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCode::PermissionDenied => "PERMISSION_DENIED",
            RejectionCode::Unsupported => "UNSUPPORTED",
            RejectionCode::SystemError => "SYSTEM_ERROR",
            RejectionCode::NotDefaultProvider => "NOT_DEFAULT_PROVIDER",
            RejectionCode::SimNotFound => "SIM_NOT_FOUND",
            RejectionCode::CallError => "CALL_ERROR",
        }
    }
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call placement that was refused before or by the platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct PlacementError {
    pub code: RejectionCode,
    pub message: String,
}

impl PlacementError {
    pub fn new(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn permission_denied() -> Self {
        Self::new(
            RejectionCode::PermissionDenied,
            "Calling permission is required to make a call.",
        )
    }

    pub fn unsupported(api_level: u32, required: u32) -> Self {
        Self::new(
            RejectionCode::Unsupported,
            format!(
                "Placing calls on a specific SIM needs platform API level {} (found {}).",
                required, api_level
            ),
        )
    }

    pub fn system_error() -> Self {
        Self::new(RejectionCode::SystemError, "Call routing service not available.")
    }

    pub fn not_default_provider() -> Self {
        Self::new(
            RejectionCode::NotDefaultProvider,
            "App must be the default call provider to place carrier calls.",
        )
    }

    pub fn sim_not_found(slot: i32) -> Self {
        Self::new(
            RejectionCode::SimNotFound,
            format!("No valid account handle found for SIM slot {}.", slot),
        )
    }

    pub fn call_error(message: impl Into<String>) -> Self {
        Self::new(RejectionCode::CallError, message)
    }
}
