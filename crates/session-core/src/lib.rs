//! # Session-Core
//!
//! Call-session lifecycle manager for AuraCall.
//!
//! This crate provides:
//! - A concurrent registry of live call sessions keyed by a stable id
//! - A per-call state machine driven by a data-driven transition table, with
//!   idempotent teardown that always leaves the registry consistent
//! - A session factory that derives keys from inbound connection requests
//! - A signal classifier that turns raw platform call-state notifications
//!   into incoming / outgoing / answered / ended events
//!
//! ## Architecture
//!
//! The platform's call engine reaches the crate through two paths. The
//! per-call path goes factory → registry → session. The system-wide path
//! feeds raw telephony signals through the classifier to an event sink. The
//! two share nothing but the registry.

pub mod classifier;
pub mod errors;
pub mod events;
pub mod factory;
pub mod platform;
pub mod registry;
pub mod session;
pub mod state_table;
pub mod types;

pub use classifier::{
    CallStateChanged, CallStateSink, DerivedDirection, RawCallState, SignalClassifier,
    TelephonySignal,
};
pub use errors::{Result, SessionError};
pub use events::{SessionEvent, SessionEventPublisher};
pub use factory::{FactoryConfig, SessionFactory};
pub use platform::{ConnectionSignal, MediaRequest, NoopPlatform, PlatformConnection};
pub use registry::{RegistryStats, SessionRegistry};
pub use session::{CallSession, SessionContext, TeardownOutcome, TransitionOutcome};
pub use state_table::{default_table, SessionCommand, StateTable};
pub use types::{CallDirection, CallState, ConnectionRequest, DisconnectCause, RemoteAddress};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
