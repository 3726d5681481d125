//! 一致性缓存
//!
//! 四个相互独立的命名空间，各自有 TTL：
//!
//! | 命名空间 | 键 | 值 |
//! |----------|----|----|
//! | zones | account id | [`HostedZonesIndex`] |
//! | records | zone id | `Vec<ResourceRecordSet>` |
//! | health checks | account id | [`HealthChecksIndex`] |
//! | health check status | health check id | `Vec<HealthCheckObservation>` |
//!
//! 没有按键失效，只有 [`DnsCache::flush_all`]。

mod entry;

use std::time::Duration;

pub use entry::TtlCache;

use crate::types::{
    HealthCheckObservation, HealthChecksIndex, HostedZonesIndex, ResourceRecordSet,
};

/// 默认 TTL
pub const DEFAULT_TTL: Duration = Duration::from_secs(15);

/// 各命名空间的 TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub zones_ttl: Duration,
    pub records_ttl: Duration,
    pub health_checks_ttl: Duration,
    pub health_check_status_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            zones_ttl: DEFAULT_TTL,
            records_ttl: DEFAULT_TTL,
            health_checks_ttl: DEFAULT_TTL,
            health_check_status_ttl: DEFAULT_TTL,
        }
    }
}

/// DNS 数据缓存，通过 [`ServiceContext`](crate::ServiceContext) 共享
pub struct DnsCache {
    pub(crate) zones: TtlCache<HostedZonesIndex>,
    pub(crate) records: TtlCache<Vec<ResourceRecordSet>>,
    pub(crate) health_checks: TtlCache<HealthChecksIndex>,
    pub(crate) health_check_status: TtlCache<Vec<HealthCheckObservation>>,
}

impl DnsCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            zones: TtlCache::new("zones", config.zones_ttl),
            records: TtlCache::new("records", config.records_ttl),
            health_checks: TtlCache::new("health-checks", config.health_checks_ttl),
            health_check_status: TtlCache::new(
                "health-check-status",
                config.health_check_status_ttl,
            ),
        }
    }

    /// 清空所有命名空间
    pub async fn flush_all(&self) {
        self.zones.clear().await;
        self.records.clear().await;
        self.health_checks.clear().await;
        self.health_check_status.clear().await;
        log::info!("DNS cache flushed");
    }
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttls_are_fifteen_seconds() {
        let config = CacheConfig::default();
        assert_eq!(config.zones_ttl, Duration::from_secs(15));
        assert_eq!(config.health_check_status_ttl, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn flush_all_clears_every_namespace() {
        let cache = DnsCache::default();
        cache.zones.insert("A", HostedZonesIndex::new()).await;
        cache.records.insert("Z1", Vec::new()).await;
        cache.health_checks.insert("A", HealthChecksIndex::new()).await;
        cache.health_check_status.insert("hc", Vec::new()).await;

        cache.flush_all().await;

        assert!(cache.zones.is_empty().await);
        assert!(cache.records.is_empty().await);
        assert!(cache.health_checks.is_empty().await);
        assert!(cache.health_check_status.is_empty().await);
    }
}
