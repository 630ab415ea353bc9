//! # AuraCall
//!
//! Native call integration for a third-party calling app.
//!
//! [`AuraCallService`] ties together the call-session lifecycle manager
//! (`auracall-session-core`) and the carrier services
//! (`auracall-carrier-core`) behind one bridge-facing surface:
//!
//! - connection creation for the platform's call-routing service
//! - per-call commands from the presentation layer, routed by session key
//! - the telephony signal stream and its classified `CallStateChanged` events
//! - carrier snapshots, SIM change notifications and carrier call placement
//!
//! ## Example
//!
//! ```no_run
//! use auracall::{AuraCallConfig, AuraCallService};
//! use auracall_session_core::NoopPlatform;
//! # use auracall_carrier_core::TelephonyProvider;
//! # use std::sync::Arc;
//! # async fn run(provider: Arc<dyn TelephonyProvider>) -> auracall::AuraCallResult<()> {
//! let config = AuraCallConfig::default().with_env_overrides()?;
//! auracall::init_logging(&config)?;
//!
//! let service = AuraCallService::new(config, Arc::new(NoopPlatform), provider)?;
//! service.start()?;
//! let mut events = service.subscribe();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod service;

pub use config::{AuraCallConfig, ClassifierConfig, EventConfig, LoggingSettings};
pub use error::{AuraCallError, AuraCallResult};
pub use events::{BridgeEvent, BridgeRejection, EventEmitter, EventStream};
pub use service::{AuraCallService, TelephonySignalSender};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber described by `config.logging`
pub fn init_logging(config: &AuraCallConfig) -> AuraCallResult<()> {
    let logging = config.logging.to_logging_config("auracall")?;
    auracall_infra_common::setup_logging(logging)?;
    auracall_infra_common::log_welcome("AuraCall", VERSION);
    Ok(())
}
