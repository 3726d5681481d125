//! 站点注册服务

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::{DnsService, ServiceContext, ZoneIndexService};
use crate::types::{
    normalize_fqdn, ActivityAction, ActivityEntry, CreateSiteRequest, Site,
};
use dns_failover_provider::strip_resource_prefix;

/// 站点服务
pub struct SiteService {
    ctx: Arc<ServiceContext>,
    dns: DnsService,
    zone_index: ZoneIndexService,
}

impl SiteService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            dns: DnsService::new(ctx.clone()),
            zone_index: ZoneIndexService::new(ctx.clone()),
            ctx,
        }
    }

    pub async fn list_sites(&self) -> CoreResult<Vec<Site>> {
        self.ctx.site_repository().find_all().await
    }

    pub async fn get_site(&self, site_id: &str) -> CoreResult<Option<Site>> {
        self.ctx.site_repository().find_by_id(site_id).await
    }

    /// 注册站点
    ///
    /// 所属账户通过托管区域索引反查；FQDN 必须在该区域中至少有一条
    /// A/AAAA/CNAME 记录。
    pub async fn register_site(&self, request: CreateSiteRequest, actor: &str) -> CoreResult<Site> {
        let name = request.name.trim().to_string();
        let zone_id = strip_resource_prefix(request.zone_id.trim()).to_string();
        if name.is_empty() || request.fqdn.trim().is_empty() || zone_id.is_empty() {
            return Err(CoreError::ValidationError(
                "Site name, FQDN and zone ID are required".into(),
            ));
        }
        let fqdn = normalize_fqdn(&request.fqdn);

        // 1. 名称和 FQDN 唯一
        let sites = self.ctx.site_repository().find_all().await?;
        if let Some(existing) = sites.iter().find(|s| s.name == name || s.fqdn == fqdn) {
            return Err(CoreError::Conflict(format!(
                "Site '{}' ({}) already exists",
                existing.name, existing.fqdn
            )));
        }

        // 2. 反查所属账户，并确认区域仍然存在
        let account_id = self.zone_index.find_account_for_zone(&zone_id).await?;
        let zones = self.dns.get_hosted_zones(&account_id, false).await?;
        if !zones.contains_key(&zone_id) {
            return Err(CoreError::ValidationError(format!(
                "Invalid hosted zone ID {zone_id}"
            )));
        }

        // 3. 区域中必须存在该 FQDN 的 A/AAAA/CNAME 记录
        let records = self.dns.get_records(&account_id, &zone_id, false).await?;
        let has_record = records
            .iter()
            .any(|r| r.name == fqdn && r.record_type.supports_failover());
        if !has_record {
            return Err(CoreError::ValidationError(format!(
                "No DNS records exist in AWS for {fqdn}"
            )));
        }

        let site = Site {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            fqdn,
            account_id,
            zone_id,
            notif_email: request.notif_email,
            notif_teams: request.notif_teams,
            monitoring_link: request.monitoring_link,
            enabled: true,
            created_at: Utc::now(),
        };

        if let Err(e) = self.ctx.site_repository().save(&site).await {
            log::error!("Failed to save site {}: {e}", site.fqdn);
            self.ctx
                .record_activity(ActivityEntry::system(
                    actor,
                    ActivityAction::Error,
                    format!(
                        "Error inserting new site {} ({}) into database",
                        site.fqdn, site.name
                    ),
                ))
                .await;
            return Err(e);
        }

        log::info!("Registered site {} in zone {}", site.fqdn, site.zone_id);
        self.ctx
            .record_activity(ActivityEntry::site(
                &site.id,
                actor,
                ActivityAction::Create,
                format!(
                    "Created new site config for {} ({}) in zone {}",
                    site.fqdn, site.name, site.zone_id
                ),
            ))
            .await;
        Ok(site)
    }

    /// 删除站点
    pub async fn delete_site(&self, site_id: &str, actor: &str) -> CoreResult<()> {
        let site = self
            .ctx
            .site_repository()
            .find_by_id(site_id)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound(site_id.to_string()))?;

        self.ctx.site_repository().delete(site_id).await?;

        self.ctx
            .record_activity(ActivityEntry::system(
                actor,
                ActivityAction::Delete,
                format!("Deleted site {} ({})", site.fqdn, site.name),
            ))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{record, site, TestHarness};
    use crate::types::{ActivityScope, RecordType};

    const ACCOUNT: &str = "111111111111";

    async fn harness() -> TestHarness {
        let h = TestHarness::new();
        h.add_account(ACCOUNT, "prod", "AKIDPROD", Some("secret")).await;
        h.gateway.add_zone("AKIDPROD", "Z1", "example.com.").await;
        h.gateway
            .add_records(
                "Z1",
                vec![
                    record("www.example.com.", RecordType::A, Some("primary"), Some(100)),
                    record("mail.example.com.", RecordType::Mx, None, None),
                ],
            )
            .await;
        h
    }

    fn request(name: &str, fqdn: &str, zone_id: &str) -> CreateSiteRequest {
        CreateSiteRequest {
            name: name.into(),
            fqdn: fqdn.into(),
            zone_id: zone_id.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn registers_site_in_owning_account() {
        let h = harness().await;
        let service = SiteService::new(h.ctx.clone());

        let site = service
            .register_site(request("www", "WWW.example.com", "/hostedzone/Z1"), "alice")
            .await
            .unwrap();
        assert_eq!(site.fqdn, "www.example.com.");
        assert_eq!(site.account_id, ACCOUNT);
        assert_eq!(site.zone_id, "Z1");
        assert!(site.enabled);
        assert_eq!(service.list_sites().await.unwrap().len(), 1);

        let entries = h.activity_log.entries().await;
        assert_eq!(entries[0].scope, ActivityScope::Site(site.id.clone()));
        assert_eq!(
            entries[0].message,
            "Created new site config for www.example.com. (www) in zone Z1"
        );
    }

    #[tokio::test]
    async fn wildcard_site_matches_escaped_record_name() {
        let h = harness().await;
        h.gateway
            .add_records(
                "Z1",
                vec![
                    record(r"\052.example.com.", RecordType::A, Some("primary"), Some(100)),
                    record(r"\052.example.com.", RecordType::A, Some("secondary"), Some(0)),
                ],
            )
            .await;
        let service = SiteService::new(h.ctx.clone());

        let site = service
            .register_site(request("wildcard", "*.example.com", "Z1"), "alice")
            .await
            .unwrap();
        assert_eq!(site.fqdn, r"\052.example.com.");

        let records = DnsService::new(h.ctx.clone())
            .get_records_for_site(&site.id, false)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_fqdn_is_conflict() {
        let h = harness().await;
        h.add_site(site("existing", "www.example.com.", ACCOUNT, "Z1")).await;
        let service = SiteService::new(h.ctx.clone());

        let err = service
            .register_site(request("other", "www.example.com.", "Z1"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_zone_is_not_found() {
        let h = harness().await;
        let service = SiteService::new(h.ctx.clone());

        let err = service
            .register_site(request("www", "www.example.com", "Z9"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::HostedZoneNotFound(_)));
    }

    #[tokio::test]
    async fn fqdn_without_address_record_is_invalid() {
        let h = harness().await;
        let service = SiteService::new(h.ctx.clone());

        let err = service
            .register_site(request("mail", "mail.example.com", "Z1"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(service.list_sites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_fields_are_invalid() {
        let h = harness().await;
        let service = SiteService::new(h.ctx.clone());

        let err = service
            .register_site(request(" ", "www.example.com", "Z1"), "alice")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[tokio::test]
    async fn delete_site_records_activity() {
        let h = harness().await;
        h.add_site(site("site-1", "www.example.com.", ACCOUNT, "Z1")).await;
        let service = SiteService::new(h.ctx.clone());

        service.delete_site("site-1", "alice").await.unwrap();
        assert!(service.get_site("site-1").await.unwrap().is_none());
        assert_eq!(
            h.activity_log.entries().await[0].action,
            ActivityAction::Delete
        );

        let err = service.delete_site("site-1", "alice").await.unwrap_err();
        assert!(matches!(err, CoreError::SiteNotFound(_)));
    }
}
