//! Carrier Query
//!
//! Best-effort carrier/SIM snapshot. Every field that cannot be read
//! degrades to a default; the query as a whole never fails.

use crate::provider::TelephonyProvider;
use crate::types::{CarrierInfo, NetworkState, SimState, SubscriptionRecord};
use std::sync::Arc;
use tracing::{debug, warn};

const UNKNOWN: &str = "UNKNOWN";

#[derive(Clone)]
pub struct CarrierQuery {
    provider: Arc<dyn TelephonyProvider>,
}

impl CarrierQuery {
    pub fn new(provider: Arc<dyn TelephonyProvider>) -> Self {
        Self { provider }
    }

    /// One entry per active subscription, or a single placeholder entry
    pub fn snapshot(&self) -> Vec<CarrierInfo> {
        let subscriptions = match self.provider.active_subscriptions() {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                warn!("Failed to list subscriptions: {}", e);
                return vec![CarrierInfo::failed(e.to_string())];
            }
        };

        let operator = self.operator_name();
        if subscriptions.is_empty() {
            debug!("No active subscriptions");
            return vec![CarrierInfo::without_subscription(
                operator.unwrap_or_else(|| UNKNOWN.to_string()),
            )];
        }

        // Per-SIM state is not reliable across platforms; the global state is
        // used for every entry.
        let sim_state = self.sim_state();
        let network_state = self.network_state();

        subscriptions
            .into_iter()
            .map(|sub| Self::entry(sub, operator.as_deref(), sim_state, network_state))
            .collect()
    }

    fn entry(
        sub: SubscriptionRecord,
        operator: Option<&str>,
        sim_state: SimState,
        network_state: NetworkState,
    ) -> CarrierInfo {
        let carrier_name = non_empty(sub.carrier_name)
            .or_else(|| operator.map(str::to_string))
            .unwrap_or_else(|| UNKNOWN.to_string());

        CarrierInfo {
            carrier_name: Some(carrier_name),
            slot_index: Some(sub.slot_index),
            phone_number: non_empty(sub.number),
            country_iso: Some(non_empty(sub.country_iso).unwrap_or_else(|| UNKNOWN.to_string())),
            sim_state: Some(sim_state),
            network_state: Some(network_state),
            subscription_id: Some(sub.subscription_id),
            error: None,
        }
    }

    fn operator_name(&self) -> Option<String> {
        match self.provider.network_operator_name() {
            Ok(name) => non_empty(name),
            Err(e) => {
                warn!("Failed to read network operator name: {}", e);
                None
            }
        }
    }

    fn sim_state(&self) -> SimState {
        self.provider
            .sim_state_code()
            .map(SimState::from_platform_code)
            .unwrap_or_else(|e| {
                warn!("Failed to read SIM state: {}", e);
                SimState::Unknown
            })
    }

    fn network_state(&self) -> NetworkState {
        self.provider
            .service_state_code()
            .map(NetworkState::from_platform_code)
            .unwrap_or_else(|e| {
                warn!("Failed to read service state: {}", e);
                NetworkState::Unknown
            })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
