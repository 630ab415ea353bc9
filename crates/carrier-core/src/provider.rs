//! Telephony platform seam
//!
//! Everything carrier-core knows about the device comes through
//! [`TelephonyProvider`]. Implementations wrap the platform's subscription,
//! telephony and call-routing services; tests use an in-memory double.

use crate::types::{AccountHandle, SubscriptionRecord};
use auracall_infra_common::PlatformError;

pub trait TelephonyProvider: Send + Sync {
    /// Platform API level
    fn api_level(&self) -> u32;

    /// Active subscriptions, one per inserted and enabled SIM
    fn active_subscriptions(&self) -> Result<Vec<SubscriptionRecord>, PlatformError>;

    /// Name of the registered network operator
    fn network_operator_name(&self) -> Result<Option<String>, PlatformError>;

    /// Global SIM state code
    fn sim_state_code(&self) -> Result<i32, PlatformError>;

    /// Service state code, `None` if the platform has none to report
    fn service_state_code(&self) -> Result<Option<i32>, PlatformError>;

    /// The active subscription in a SIM slot
    fn subscription_for_slot(&self, slot: i32) -> Result<Option<SubscriptionRecord>, PlatformError>;

    /// Account handles able to place calls
    fn call_capable_accounts(&self) -> Result<Vec<AccountHandle>, PlatformError>;

    /// Whether the app holds the calling privilege
    fn has_call_permission(&self) -> bool;

    /// Whether the call-routing service is reachable
    fn routing_service_available(&self) -> bool;

    /// Whether the app is the default call-routing provider
    fn is_default_provider(&self) -> Result<bool, PlatformError>;

    /// Ask the platform to prompt the user to make the app the default provider
    fn request_default_provider(&self) -> Result<(), PlatformError>;

    /// Place a call to `uri` through `handle`
    fn place_call(&self, uri: &str, handle: &AccountHandle) -> Result<(), PlatformError>;
}
