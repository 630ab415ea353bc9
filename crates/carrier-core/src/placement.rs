//! Call Placement
//!
//! Places carrier calls on a chosen SIM slot through the platform's call
//! routing service. Preconditions are checked in a fixed order and the first
//! one that fails decides the rejection code.

use crate::config::CarrierConfig;
use crate::error::{CarrierError, CarrierResult, PlacementError};
use crate::provider::TelephonyProvider;
use crate::types::{AccountHandle, DefaultProviderStatus, PlacementOutcome};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct CallPlacer {
    provider: Arc<dyn TelephonyProvider>,
    min_api_level: u32,
}

impl CallPlacer {
    pub fn new(provider: Arc<dyn TelephonyProvider>, config: &CarrierConfig) -> Self {
        Self {
            provider,
            min_api_level: config.placement_min_api_level,
        }
    }

    /// Place a call to `number` on the SIM in `slot`
    pub fn place_call(&self, number: &str, slot: i32) -> Result<PlacementOutcome, PlacementError> {
        if !self.provider.has_call_permission() {
            return Err(PlacementError::permission_denied());
        }

        let api_level = self.provider.api_level();
        if api_level < self.min_api_level {
            return Err(PlacementError::unsupported(api_level, self.min_api_level));
        }

        if !self.provider.routing_service_available() {
            return Err(PlacementError::system_error());
        }

        match self.provider.is_default_provider() {
            Ok(true) => {}
            Ok(false) => return Err(PlacementError::not_default_provider()),
            Err(e) => {
                warn!("Failed to check default provider: {}", e);
                return Err(PlacementError::call_error(e.to_string()));
            }
        }

        let handle = self
            .resolve_handle(slot)
            .ok_or_else(|| PlacementError::sim_not_found(slot))?;

        let uri = format!("tel:{}", number);
        self.provider
            .place_call(&uri, &handle)
            .map_err(|e| PlacementError::call_error(e.message))?;

        info!("Placed call to {} via {}", uri, handle.id);
        Ok(PlacementOutcome::CallStarted)
    }

    /// Pick the account handle for a SIM slot.
    ///
    /// Prefers a handle whose id contains the slot's subscription id, then
    /// one whose id contains the slot index, then the first handle.
    pub fn resolve_handle(&self, slot: i32) -> Option<AccountHandle> {
        let subscription = self.provider.subscription_for_slot(slot).unwrap_or_else(|e| {
            warn!("Failed to look up subscription for slot {}: {}", slot, e);
            None
        });
        let accounts = self.provider.call_capable_accounts().unwrap_or_else(|e| {
            warn!("Failed to list call-capable accounts: {}", e);
            Vec::new()
        });

        if let Some(sub) = subscription {
            let sub_id = sub.subscription_id.to_string();
            if let Some(handle) = accounts.iter().find(|h| h.id.contains(&sub_id)) {
                return Some(handle.clone());
            }
        }

        let slot_str = slot.to_string();
        if let Some(handle) = accounts.iter().find(|h| h.id.contains(&slot_str)) {
            return Some(handle.clone());
        }

        accounts.into_iter().next()
    }

    /// Make sure the app is the default provider, prompting if it is not
    pub fn ensure_default_provider(&self) -> CarrierResult<DefaultProviderStatus> {
        if !self.provider.routing_service_available() {
            return Err(CarrierError::unavailable("call routing"));
        }
        if self.provider.is_default_provider()? {
            return Ok(DefaultProviderStatus::AlreadyDefault);
        }
        self.provider.request_default_provider()?;
        info!("Requested default provider change");
        Ok(DefaultProviderStatus::Requested)
    }
}
