//! # Carrier-Core
//!
//! Carrier and SIM introspection for AuraCall.
//!
//! This crate provides:
//! - A best-effort carrier snapshot per active subscription
//! - A SIM state monitor that pushes debounced snapshots on SIM events
//! - Carrier call placement on a chosen SIM slot with stable rejection codes
//! - The default call-provider check and request
//!
//! All device access goes through the [`TelephonyProvider`] trait.

pub mod config;
pub mod error;
pub mod monitor;
pub mod placement;
pub mod provider;
pub mod query;
pub mod types;

pub use config::CarrierConfig;
pub use error::{CarrierError, CarrierResult, PlacementError, RejectionCode};
pub use monitor::{CarrierSink, SimMonitor};
pub use placement::CallPlacer;
pub use provider::TelephonyProvider;
pub use query::CarrierQuery;
pub use types::{
    AccountHandle, CarrierInfo, DefaultProviderStatus, NetworkState, PlacementOutcome, SimEvent,
    SimState, SubscriptionRecord,
};
