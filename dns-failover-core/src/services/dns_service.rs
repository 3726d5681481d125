//! DNS 数据读取服务（带缓存）

use std::sync::Arc;

use dns_failover_provider::ProviderError;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    ActivityAction, ActivityEntry, ChangeBatch, ChangeInfo, HealthCheckObservation,
    HealthChecksIndex, HostedZonesIndex, ResourceRecordSet, SYSTEM_ACTOR,
};
use crate::utils::index_by;

/// DNS 数据服务
///
/// 所有读取都先查缓存，未命中时才解析凭证并调用网关。
pub struct DnsService {
    ctx: Arc<ServiceContext>,
}

impl DnsService {
    /// 创建 DNS 服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 账户下的所有托管区域，以 zone id 为键
    pub async fn get_hosted_zones(
        &self,
        account_id: &str,
        force: bool,
    ) -> CoreResult<HostedZonesIndex> {
        let ctx = &self.ctx;
        ctx.cache()
            .zones
            .get_or_fetch(account_id, force, move || async move {
                let credentials = ctx.resolve_credentials(account_id).await?;
                match ctx.gateway().list_hosted_zones(&credentials).await {
                    Ok(zones) => Ok(index_by(zones, |zone| zone.id.clone())),
                    Err(e) => Err(self
                        .provider_failure(e, &format!("hosted zones in account {account_id}"))
                        .await),
                }
            })
            .await
    }

    /// 托管区域中的所有记录
    pub async fn get_records(
        &self,
        account_id: &str,
        zone_id: &str,
        force: bool,
    ) -> CoreResult<Vec<ResourceRecordSet>> {
        let ctx = &self.ctx;
        ctx.cache()
            .records
            .get_or_fetch(zone_id, force, move || async move {
                let credentials = ctx.resolve_credentials(account_id).await?;
                match ctx
                    .gateway()
                    .list_resource_record_sets(&credentials, zone_id)
                    .await
                {
                    Ok(records) => Ok(records),
                    Err(e) => Err(self
                        .provider_failure(e, &format!("resource records in zone {zone_id}"))
                        .await),
                }
            })
            .await
    }

    /// 站点 FQDN 对应的记录
    pub async fn get_records_for_site(
        &self,
        site_id: &str,
        force: bool,
    ) -> CoreResult<Vec<ResourceRecordSet>> {
        let site = self
            .ctx
            .site_repository()
            .find_by_id(site_id)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound(site_id.to_string()))?;

        let records = self
            .get_records(&site.account_id, &site.zone_id, force)
            .await?;
        Ok(records
            .into_iter()
            .filter(|record| record.name == site.fqdn)
            .collect())
    }

    /// 账户下的所有健康检查，以 health check id 为键
    pub async fn get_health_checks(
        &self,
        account_id: &str,
        force: bool,
    ) -> CoreResult<HealthChecksIndex> {
        let ctx = &self.ctx;
        ctx.cache()
            .health_checks
            .get_or_fetch(account_id, force, move || async move {
                let credentials = ctx.resolve_credentials(account_id).await?;
                match ctx.gateway().list_health_checks(&credentials).await {
                    Ok(checks) => Ok(index_by(checks, |check| check.id.clone())),
                    Err(e) => Err(self
                        .provider_failure(e, &format!("health checks in account {account_id}"))
                        .await),
                }
            })
            .await
    }

    /// 健康检查在各检查点的最新观测结果
    pub async fn get_health_check_observations(
        &self,
        account_id: &str,
        health_check_id: &str,
        force: bool,
    ) -> CoreResult<Vec<HealthCheckObservation>> {
        let ctx = &self.ctx;
        ctx.cache()
            .health_check_status
            .get_or_fetch(health_check_id, force, move || async move {
                let credentials = ctx.resolve_credentials(account_id).await?;
                Ok(ctx
                    .gateway()
                    .get_health_check_status(&credentials, health_check_id)
                    .await?)
            })
            .await
    }

    /// 提交记录变更；不经过缓存，也不使缓存失效
    pub async fn update_records(
        &self,
        account_id: &str,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> CoreResult<ChangeInfo> {
        let credentials = self.ctx.resolve_credentials(account_id).await?;
        let info = self
            .ctx
            .gateway()
            .change_resource_record_sets(&credentials, zone_id, batch)
            .await?;
        log::info!(
            "Change {} submitted to zone {zone_id} ({:?})",
            info.id,
            info.status
        );
        Ok(info)
    }

    /// 清空所有缓存
    pub async fn flush_cache(&self) {
        self.ctx.cache().flush_all().await;
        self.ctx
            .record_activity(ActivityEntry::system(
                SYSTEM_ACTOR,
                ActivityAction::FlushCache,
                "Flushed DNS cache",
            ))
            .await;
    }

    /// 列表被截断时记录一条系统错误
    async fn provider_failure(&self, err: ProviderError, what: &str) -> CoreError {
        if let ProviderError::Truncated { .. } = &err {
            self.ctx
                .record_activity(ActivityEntry::system(
                    SYSTEM_ACTOR,
                    ActivityAction::Error,
                    format!("Too many {what}, please implement pagination"),
                ))
                .await;
        }
        CoreError::Provider(err)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::{record, site, TestHarness};
    use crate::types::{ActivityScope, RecordType};

    const ACCOUNT: &str = "111111111111";

    async fn harness() -> TestHarness {
        let h = TestHarness::new();
        h.add_account(ACCOUNT, "prod", "AKIDPROD", Some("secret")).await;
        h.gateway.add_zone("AKIDPROD", "Z1", "example.com.").await;
        h
    }

    #[tokio::test(start_paused = true)]
    async fn zones_are_cached_within_ttl() {
        let h = harness().await;
        let service = DnsService::new(h.ctx.clone());

        let zones = service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        assert!(zones.contains_key("Z1"));
        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        assert_eq!(h.gateway.calls().list_hosted_zones, 1);

        tokio::time::advance(Duration::from_secs(15)).await;
        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        assert_eq!(h.gateway.calls().list_hosted_zones, 2);
    }

    #[tokio::test]
    async fn force_refresh_calls_gateway_once() {
        let h = harness().await;
        let service = DnsService::new(h.ctx.clone());

        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        service.get_hosted_zones(ACCOUNT, true).await.unwrap();
        assert_eq!(h.gateway.calls().list_hosted_zones, 2);

        // 强制刷新后的值重新写入缓存
        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        assert_eq!(h.gateway.calls().list_hosted_zones, 2);
    }

    #[tokio::test]
    async fn cache_hit_skips_credential_lookup() {
        let h = harness().await;
        let service = DnsService::new(h.ctx.clone());

        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        h.credential_store.clear().await;

        assert!(service.get_hosted_zones(ACCOUNT, false).await.is_ok());
        let err = service.get_hosted_zones(ACCOUNT, true).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn flush_forces_refetch_of_every_namespace() {
        let h = harness().await;
        h.gateway
            .add_records("Z1", vec![record("www.example.com.", RecordType::A, None, None)])
            .await;
        h.gateway.add_health_check("AKIDPROD", "hc-1").await;
        let service = DnsService::new(h.ctx.clone());

        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        service.get_records(ACCOUNT, "Z1", false).await.unwrap();
        service.get_health_checks(ACCOUNT, false).await.unwrap();
        service
            .get_health_check_observations(ACCOUNT, "hc-1", false)
            .await
            .unwrap();

        service.flush_cache().await;

        service.get_hosted_zones(ACCOUNT, false).await.unwrap();
        service.get_records(ACCOUNT, "Z1", false).await.unwrap();
        service.get_health_checks(ACCOUNT, false).await.unwrap();
        service
            .get_health_check_observations(ACCOUNT, "hc-1", false)
            .await
            .unwrap();

        let calls = h.gateway.calls();
        assert_eq!(calls.list_hosted_zones, 2);
        assert_eq!(calls.list_resource_record_sets, 2);
        assert_eq!(calls.list_health_checks, 2);
        assert_eq!(calls.get_health_check_status, 2);

        let entries = h.activity_log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, ActivityAction::FlushCache);
        assert_eq!(entries[0].actor, SYSTEM_ACTOR);
    }

    #[tokio::test]
    async fn truncation_is_fatal_and_not_cached() {
        let h = harness().await;
        h.gateway.set_truncate_zones(true);
        let service = DnsService::new(h.ctx.clone());

        let err = service.get_hosted_zones(ACCOUNT, false).await.unwrap_err();
        assert!(err.is_truncated());
        assert!(h.ctx.cache().zones.is_empty().await);

        let entries = h.activity_log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].scope, ActivityScope::System);
        assert_eq!(entries[0].action, ActivityAction::Error);
        assert_eq!(
            entries[0].message,
            format!("Too many hosted zones in account {ACCOUNT}, please implement pagination")
        );

        // 再次调用仍然访问网关
        h.gateway.set_truncate_zones(false);
        assert!(service.get_hosted_zones(ACCOUNT, false).await.is_ok());
        assert_eq!(h.gateway.calls().list_hosted_zones, 2);
    }

    #[tokio::test]
    async fn truncated_records_are_not_cached() {
        let h = harness().await;
        h.gateway
            .add_records("Z1", vec![record("www.example.com.", RecordType::A, None, None)])
            .await;
        h.gateway.set_truncate_records(true);
        let service = DnsService::new(h.ctx.clone());

        let err = service.get_records(ACCOUNT, "Z1", false).await.unwrap_err();
        assert!(err.is_truncated());
        assert!(h.ctx.cache().records.is_empty().await);

        let entries = h.activity_log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].message,
            "Too many resource records in zone Z1, please implement pagination"
        );

        h.gateway.set_truncate_records(false);
        assert_eq!(service.get_records(ACCOUNT, "Z1", false).await.unwrap().len(), 1);
        assert_eq!(h.gateway.calls().list_resource_record_sets, 2);
    }

    #[tokio::test]
    async fn truncated_health_checks_are_not_cached() {
        let h = harness().await;
        h.gateway.add_health_check("AKIDPROD", "hc-1").await;
        h.gateway.set_truncate_health_checks(true);
        let service = DnsService::new(h.ctx.clone());

        let err = service.get_health_checks(ACCOUNT, false).await.unwrap_err();
        assert!(err.is_truncated());
        assert!(h.ctx.cache().health_checks.is_empty().await);

        let entries = h.activity_log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, ActivityAction::Error);
        assert_eq!(
            entries[0].message,
            format!("Too many health checks in account {ACCOUNT}, please implement pagination")
        );

        h.gateway.set_truncate_health_checks(false);
        let checks = service.get_health_checks(ACCOUNT, false).await.unwrap();
        assert!(checks.contains_key("hc-1"));
        assert_eq!(h.gateway.calls().list_health_checks, 2);
    }

    #[tokio::test]
    async fn site_records_are_filtered_by_fqdn() {
        let h = harness().await;
        h.gateway
            .add_records(
                "Z1",
                vec![
                    record("www.example.com.", RecordType::A, Some("primary"), Some(100)),
                    record("api.example.com.", RecordType::A, None, None),
                    record("www.example.com.", RecordType::A, Some("secondary"), Some(0)),
                ],
            )
            .await;
        h.add_site(site("site-1", "www.example.com.", ACCOUNT, "Z1")).await;
        let service = DnsService::new(h.ctx.clone());

        let records = service.get_records_for_site("site-1", false).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.name == "www.example.com."));
    }

    #[tokio::test]
    async fn unknown_site_is_not_found() {
        let h = harness().await;
        let service = DnsService::new(h.ctx.clone());

        let err = service.get_records_for_site("nope", false).await.unwrap_err();
        assert!(matches!(err, CoreError::SiteNotFound(_)));
        assert_eq!(h.gateway.calls().list_resource_record_sets, 0);
    }

    #[tokio::test]
    async fn health_checks_are_indexed_by_id() {
        let h = harness().await;
        h.gateway.add_health_check("AKIDPROD", "hc-1").await;
        h.gateway.add_health_check("AKIDPROD", "hc-2").await;
        let service = DnsService::new(h.ctx.clone());

        let checks = service.get_health_checks(ACCOUNT, false).await.unwrap();
        assert_eq!(checks.keys().collect::<Vec<_>>(), ["hc-1", "hc-2"]);
    }

    #[tokio::test]
    async fn update_records_submits_batch() {
        let h = harness().await;
        let service = DnsService::new(h.ctx.clone());
        let batch = ChangeBatch {
            comment: Some("manual".into()),
            changes: vec![crate::types::Change {
                action: crate::types::ChangeAction::Upsert,
                resource_record_set: record("www.example.com.", RecordType::A, None, None),
            }],
        };

        let info = service.update_records(ACCOUNT, "Z1", &batch).await.unwrap();
        assert!(!info.id.is_empty());
        assert_eq!(h.gateway.submitted().await, vec![("Z1".to_string(), batch)]);
    }
}
