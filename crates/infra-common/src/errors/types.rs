use thiserror::Error;

/// Result type for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the shared infrastructure
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The logging subsystem could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure reported by a platform collaborator (call engine, telephony
/// service, routing service).
///
/// Platform calls are best-effort from the point of view of this stack: the
/// caller logs the error and degrades instead of propagating it, so the type
/// only carries what is needed for a useful log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("platform operation '{operation}' failed: {message}")]
pub struct PlatformError {
    /// Name of the platform operation that failed
    pub operation: String,
    /// Message reported by the platform
    pub message: String,
}

impl PlatformError {
    /// Create a new platform error
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// The operation is not available on this platform build
    pub fn unavailable(operation: impl Into<String>) -> Self {
        Self::new(operation, "not available")
    }
}
