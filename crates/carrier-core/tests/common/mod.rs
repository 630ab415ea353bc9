// In-memory telephony provider for carrier-core tests
#![allow(dead_code)]

use auracall_carrier_core::{AccountHandle, SubscriptionRecord, TelephonyProvider};
use auracall_infra_common::PlatformError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeProvider {
    pub api_level: u32,
    pub subscriptions: Result<Vec<SubscriptionRecord>, PlatformError>,
    pub operator_name: Option<String>,
    pub sim_state_code: Result<i32, PlatformError>,
    pub service_state_code: Option<i32>,
    pub accounts: Vec<AccountHandle>,
    pub permission: bool,
    pub routing_available: bool,
    pub default_provider: bool,
    pub refuse_placement: bool,
    pub placed: Mutex<Vec<(String, AccountHandle)>>,
    pub default_requests: AtomicUsize,
    pub snapshot_reads: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            api_level: 30,
            subscriptions: Ok(Vec::new()),
            operator_name: Some("Acme Mobile".to_string()),
            sim_state_code: Ok(5),
            service_state_code: Some(0),
            accounts: Vec::new(),
            permission: true,
            routing_available: true,
            default_provider: true,
            refuse_placement: false,
            placed: Mutex::new(Vec::new()),
            default_requests: AtomicUsize::new(0),
            snapshot_reads: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    /// Two SIMs with matching call-capable accounts
    pub fn dual_sim() -> Self {
        Self {
            subscriptions: Ok(vec![
                subscription(11, 0, Some("Acme"), Some("+15550100")),
                subscription(12, 1, None, None),
            ]),
            accounts: vec![
                AccountHandle::new("sim-account-11"),
                AccountHandle::new("sim-account-12"),
            ],
            ..Self::default()
        }
    }

    pub fn placed(&self) -> Vec<(String, AccountHandle)> {
        self.placed.lock().unwrap().clone()
    }
}

pub fn subscription(
    subscription_id: i32,
    slot_index: i32,
    carrier_name: Option<&str>,
    number: Option<&str>,
) -> SubscriptionRecord {
    SubscriptionRecord {
        subscription_id,
        slot_index,
        carrier_name: carrier_name.map(str::to_string),
        number: number.map(str::to_string),
        country_iso: Some("us".to_string()),
    }
}

impl TelephonyProvider for FakeProvider {
    fn api_level(&self) -> u32 {
        self.api_level
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionRecord>, PlatformError> {
        self.snapshot_reads.fetch_add(1, Ordering::SeqCst);
        self.subscriptions.clone()
    }

    fn network_operator_name(&self) -> Result<Option<String>, PlatformError> {
        Ok(self.operator_name.clone())
    }

    fn sim_state_code(&self) -> Result<i32, PlatformError> {
        self.sim_state_code.clone()
    }

    fn service_state_code(&self) -> Result<Option<i32>, PlatformError> {
        Ok(self.service_state_code)
    }

    fn subscription_for_slot(&self, slot: i32) -> Result<Option<SubscriptionRecord>, PlatformError> {
        let subscriptions = self.subscriptions.clone()?;
        Ok(subscriptions.into_iter().find(|s| s.slot_index == slot))
    }

    fn call_capable_accounts(&self) -> Result<Vec<AccountHandle>, PlatformError> {
        Ok(self.accounts.clone())
    }

    fn has_call_permission(&self) -> bool {
        self.permission
    }

    fn routing_service_available(&self) -> bool {
        self.routing_available
    }

    fn is_default_provider(&self) -> Result<bool, PlatformError> {
        Ok(self.default_provider)
    }

    fn request_default_provider(&self) -> Result<(), PlatformError> {
        self.default_requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn place_call(&self, uri: &str, handle: &AccountHandle) -> Result<(), PlatformError> {
        if self.refuse_placement {
            return Err(PlatformError::new("placeCall", "refused by platform"));
        }
        self.placed
            .lock()
            .unwrap()
            .push((uri.to_string(), handle.clone()));
        Ok(())
    }
}
