//! Platform call-engine seam
//!
//! The native call engine owns the real connection objects. A call session
//! tells it about lifecycle changes through [`PlatformConnection`]; the
//! engine's own notifications come back in through the session's command
//! methods. Every call here is fallible and every failure is non-fatal for
//! the session.

use crate::types::DisconnectCause;
use auracall_infra_common::PlatformError;

/// Lifecycle signal pushed from a session to the platform connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSignal {
    Initializing,
    Dialing,
    Ringing,
    Active,
    Held,
    Disconnected(DisconnectCause),
}

/// Media request forwarded to the platform without touching session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRequest {
    /// Start playing a DTMF tone
    PlayTone(char),
    /// Stop the current DTMF tone
    StopTone,
    /// Real-time text stream opened
    StartRtt,
    /// Real-time text stream closed
    StopRtt,
}

/// Outbound interface to the platform's call engine
pub trait PlatformConnection: Send + Sync {
    /// Publish a lifecycle change for the connection behind `key`
    fn signal(&self, key: &str, signal: ConnectionSignal) -> Result<(), PlatformError>;

    /// Attach a remote address to the connection
    fn set_address(&self, key: &str, address: &str) -> Result<(), PlatformError>;

    /// Forward a media request
    fn media(&self, key: &str, request: MediaRequest) -> Result<(), PlatformError>;

    /// Release the platform connection. Called once per session.
    fn destroy(&self, key: &str) -> Result<(), PlatformError>;
}

/// Platform connection that accepts everything and only logs.
///
/// Used when the process runs without a native call engine attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlatform;

impl PlatformConnection for NoopPlatform {
    fn signal(&self, key: &str, signal: ConnectionSignal) -> Result<(), PlatformError> {
        tracing::trace!("noop platform: {} <- {:?}", key, signal);
        Ok(())
    }

    fn set_address(&self, key: &str, address: &str) -> Result<(), PlatformError> {
        tracing::trace!("noop platform: {} address {}", key, address);
        Ok(())
    }

    fn media(&self, key: &str, request: MediaRequest) -> Result<(), PlatformError> {
        tracing::trace!("noop platform: {} media {:?}", key, request);
        Ok(())
    }

    fn destroy(&self, key: &str) -> Result<(), PlatformError> {
        tracing::trace!("noop platform: {} destroyed", key);
        Ok(())
    }
}
