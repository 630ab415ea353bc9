//! Service configuration
//!
//! Loaded from TOML, every section optional:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [factory]
//! manage_connections = true
//!
//! [carrier]
//! sim_update_debounce_ms = 500
//! ```
//!
//! Environment variables override file values: `AURACALL_LOG_LEVEL`,
//! `AURACALL_MANAGE_CONNECTIONS`, `AURACALL_SIM_DEBOUNCE_MS`.

use crate::error::{AuraCallError, AuraCallResult};
use auracall_carrier_core::CarrierConfig;
use auracall_infra_common::{parse_log_level, LoggingConfig};
use auracall_session_core::events::DEFAULT_EVENT_CAPACITY;
use auracall_session_core::FactoryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_LOG_LEVEL: &str = "AURACALL_LOG_LEVEL";
pub const ENV_MANAGE_CONNECTIONS: &str = "AURACALL_MANAGE_CONNECTIONS";
pub const ENV_SIM_DEBOUNCE_MS: &str = "AURACALL_SIM_DEBOUNCE_MS";

/// Logging section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    pub file_info: bool,
    pub log_spans: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
            log_spans: false,
        }
    }
}

impl LoggingSettings {
    /// Convert to the subscriber configuration
    pub fn to_logging_config(&self, app_name: &str) -> AuraCallResult<LoggingConfig> {
        let mut config = LoggingConfig::new(parse_log_level(&self.level)?, app_name);
        if self.json {
            config = config.with_json();
        }
        if self.file_info {
            config = config.with_file_info();
        }
        if self.log_spans {
            config = config.with_spans();
        }
        Ok(config)
    }
}

/// Telephony signal classifier section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Inbound telephony signal buffer
    pub signal_buffer: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { signal_buffer: 64 }
    }
}

/// Event delivery section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Broadcast buffer per subscriber; slow subscribers skip older events
    pub capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraCallConfig {
    pub logging: LoggingSettings,
    pub factory: FactoryConfig,
    pub classifier: ClassifierConfig,
    pub events: EventConfig,
    pub carrier: CarrierConfig,
}

impl AuraCallConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> AuraCallResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| AuraCallError::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> AuraCallResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AuraCallError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> AuraCallResult<Self> {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            parse_log_level(&level)?;
            self.logging.level = level.trim().to_string();
        }
        if let Ok(value) = std::env::var(ENV_MANAGE_CONNECTIONS) {
            self.factory.manage_connections = parse_bool(&value).ok_or_else(|| {
                AuraCallError::config(format!(
                    "{} must be a boolean, got '{}'",
                    ENV_MANAGE_CONNECTIONS, value
                ))
            })?;
        }
        if let Ok(value) = std::env::var(ENV_SIM_DEBOUNCE_MS) {
            self.carrier.sim_update_debounce_ms = value.trim().parse().map_err(|_| {
                AuraCallError::config(format!(
                    "{} must be milliseconds, got '{}'",
                    ENV_SIM_DEBOUNCE_MS, value
                ))
            })?;
        }
        Ok(self)
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    pub fn with_manage_connections(mut self, manage: bool) -> Self {
        self.factory.manage_connections = manage;
        self
    }

    pub fn with_sim_debounce_ms(mut self, millis: u64) -> Self {
        self.carrier.sim_update_debounce_ms = millis;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.events.capacity = capacity;
        self
    }

    pub fn validate(&self) -> AuraCallResult<()> {
        parse_log_level(&self.logging.level)?;
        if self.events.capacity == 0 {
            return Err(AuraCallError::config("events.capacity must be greater than zero"));
        }
        if self.classifier.signal_buffer == 0 {
            return Err(AuraCallError::config("classifier.signal_buffer must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
