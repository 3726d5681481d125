//! Application configuration (TOML).
//!
//! ```toml
//! [cache]
//! zones_ttl_secs = 15
//! records_ttl_secs = 15
//! health_checks_ttl_secs = 15
//! health_check_status_ttl_secs = 15
//!
//! [gateway]
//! max_retries = 0
//! request_timeout_secs = 30
//! ```
//!
//! Every field is optional.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use dns_failover_core::error::{CoreError, CoreResult};
use dns_failover_core::CacheConfig;

const DEFAULT_TTL_SECS: u64 = 15;

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub cache: CacheSettings,
    pub gateway: GatewaySettings,
}

/// Per-namespace cache TTLs, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub zones_ttl_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub records_ttl_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub health_checks_ttl_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub health_check_status_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            zones_ttl_secs: DEFAULT_TTL_SECS,
            records_ttl_secs: DEFAULT_TTL_SECS,
            health_checks_ttl_secs: DEFAULT_TTL_SECS,
            health_check_status_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

/// Route 53 / STS client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySettings {
    /// Retries for transient errors inside the HTTP layer. Off by default.
    pub max_retries: u32,
    /// Per-request timeout. No timeout when absent.
    pub request_timeout_secs: Option<u64>,
}

impl GatewaySettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    /// Loads the configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ValidationError(format!(
                "failed to read configuration file {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&raw)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| {
            CoreError::ValidationError(format!("failed to parse configuration: {e}"))
        })?;
        log::debug!("{config:?}");
        Ok(config)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            zones_ttl: Duration::from_secs(self.cache.zones_ttl_secs),
            records_ttl: Duration::from_secs(self.cache.records_ttl_secs),
            health_checks_ttl: Duration::from_secs(self.cache.health_checks_ttl_secs),
            health_check_status_ttl: Duration::from_secs(self.cache.health_check_status_ttl_secs),
        }
    }
}
