// Shared helpers for AuraCall service tests
#![allow(dead_code)]

use auracall::{AuraCallConfig, AuraCallService, BridgeEvent, EventStream};
use auracall_carrier_core::{AccountHandle, SubscriptionRecord, TelephonyProvider};
use auracall_infra_common::PlatformError;
use auracall_session_core::NoopPlatform;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;

/// Single-SIM provider with switchable permission
pub struct FakeProvider {
    pub permission: bool,
    pub placed: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            permission: true,
            placed: Mutex::new(Vec::new()),
        }
    }

    pub fn without_permission() -> Self {
        Self {
            permission: false,
            ..Self::new()
        }
    }

    pub fn placed(&self) -> Vec<String> {
        self.placed.lock().clone()
    }
}

impl TelephonyProvider for FakeProvider {
    fn api_level(&self) -> u32 {
        30
    }

    fn active_subscriptions(&self) -> Result<Vec<SubscriptionRecord>, PlatformError> {
        Ok(vec![SubscriptionRecord {
            subscription_id: 7,
            slot_index: 0,
            carrier_name: Some("Acme".to_string()),
            number: Some("+15550100".to_string()),
            country_iso: Some("us".to_string()),
        }])
    }

    fn network_operator_name(&self) -> Result<Option<String>, PlatformError> {
        Ok(Some("Acme".to_string()))
    }

    fn sim_state_code(&self) -> Result<i32, PlatformError> {
        Ok(5)
    }

    fn service_state_code(&self) -> Result<Option<i32>, PlatformError> {
        Ok(Some(0))
    }

    fn subscription_for_slot(&self, slot: i32) -> Result<Option<SubscriptionRecord>, PlatformError> {
        Ok(self
            .active_subscriptions()?
            .into_iter()
            .find(|s| s.slot_index == slot))
    }

    fn call_capable_accounts(&self) -> Result<Vec<AccountHandle>, PlatformError> {
        Ok(vec![AccountHandle::new("sim-account-7")])
    }

    fn has_call_permission(&self) -> bool {
        self.permission
    }

    fn routing_service_available(&self) -> bool {
        true
    }

    fn is_default_provider(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    fn request_default_provider(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn place_call(&self, uri: &str, _handle: &AccountHandle) -> Result<(), PlatformError> {
        self.placed.lock().push(uri.to_string());
        Ok(())
    }
}

pub fn service_with(config: AuraCallConfig, provider: Arc<FakeProvider>) -> AuraCallService {
    AuraCallService::new(config, Arc::new(NoopPlatform), provider).unwrap()
}

pub fn service() -> (AuraCallService, Arc<FakeProvider>) {
    let provider = Arc::new(FakeProvider::new());
    (service_with(AuraCallConfig::default(), provider.clone()), provider)
}

/// Next event accepted by `filter`, skipping everything else
pub async fn next_matching<F>(events: &mut EventStream, mut filter: F) -> BridgeEvent
where
    F: FnMut(&BridgeEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.next().await {
                Some(Ok(event)) if filter(&event) => return event,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
