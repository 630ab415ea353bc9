use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default SIM update debounce in milliseconds
pub const DEFAULT_SIM_UPDATE_DEBOUNCE_MS: u64 = 500;

/// First platform API level that can place calls on a chosen SIM
pub const DEFAULT_PLACEMENT_MIN_API_LEVEL: u32 = 23;

/// Carrier-core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    /// Quiet period before a carrier snapshot is pushed after SIM events
    pub sim_update_debounce_ms: u64,
    /// Minimum API level for `place_call`
    pub placement_min_api_level: u32,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            sim_update_debounce_ms: DEFAULT_SIM_UPDATE_DEBOUNCE_MS,
            placement_min_api_level: DEFAULT_PLACEMENT_MIN_API_LEVEL,
        }
    }
}

impl CarrierConfig {
    pub fn sim_update_debounce(&self) -> Duration {
        Duration::from_millis(self.sim_update_debounce_ms)
    }
}
