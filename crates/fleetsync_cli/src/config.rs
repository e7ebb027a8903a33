//! Configuration file loading and validation.
//!
//! The bridge is configured through a single TOML file. Everything here is
//! validated up front; any violation is a fatal configuration error that
//! prevents startup.

use fleetsync_engine::{SyncError, SyncResult, VehicleMapping, MIN_SYNC_INTERVAL};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Connection settings for the provider (read side) API.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the provider API.
    pub base_url: String,
    /// Access key for the provider API.
    pub api_key: String,
}

/// Connection settings for the consumer (write side) API.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumerSettings {
    /// Base URL of the consumer API.
    pub base_url: String,
    /// Bearer token for the consumer API.
    pub api_key: String,
}

/// Sync loop settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    /// Polling interval in seconds. Minimum 30.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Comma-separated provider vehicle ids.
    pub provider_vehicle_ids: String,
    /// Comma-separated consumer vehicle ids, positionally paired with the
    /// provider list.
    pub consumer_vehicle_ids: String,
}

fn default_interval_secs() -> u64 {
    60
}

/// The complete bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Provider settings.
    pub provider: ProviderSettings,
    /// Consumer settings.
    pub consumer: ConsumerSettings,
    /// Sync loop settings.
    pub sync: SyncSettings,
}

impl BridgeConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::configuration(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let config: BridgeConfig = toml::from_str(&content)
            .map_err(|e| SyncError::configuration(format!("invalid config file: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks URL shape, credentials, id pairing, and the interval minimum.
    pub fn validate(&self) -> SyncResult<()> {
        validate_base_url("provider.base_url", &self.provider.base_url)?;
        validate_base_url("consumer.base_url", &self.consumer.base_url)?;
        validate_api_key("provider.api_key", &self.provider.api_key)?;
        validate_api_key("consumer.api_key", &self.consumer.api_key)?;

        if self.interval() < MIN_SYNC_INTERVAL {
            return Err(SyncError::configuration(format!(
                "sync.interval_secs must be at least {}, got {}",
                MIN_SYNC_INTERVAL.as_secs(),
                self.sync.interval_secs
            )));
        }

        // Validates pairing: lengths, emptiness, duplicate provider ids.
        self.vehicle_mapping()?;
        Ok(())
    }

    /// The polling interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sync.interval_secs)
    }

    /// Builds the vehicle mapping from the configured id lists.
    pub fn vehicle_mapping(&self) -> SyncResult<VehicleMapping> {
        VehicleMapping::from_lists(
            split_ids(&self.sync.provider_vehicle_ids),
            split_ids(&self.sync.consumer_vehicle_ids),
        )
    }
}

/// Splits a comma-separated id list, trimming entries and dropping empties.
fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn validate_base_url(field: &str, value: &str) -> SyncResult<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        SyncError::configuration(format!("{field} is not a valid absolute URL: {e}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SyncError::configuration(format!(
            "{field} must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(())
}

fn validate_api_key(field: &str, value: &str) -> SyncResult<()> {
    if value.trim().is_empty() {
        return Err(SyncError::configuration(format!(
            "{field} must not be empty or whitespace"
        )));
    }
    Ok(())
}
