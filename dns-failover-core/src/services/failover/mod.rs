//! 故障切换编排

mod changeset;

pub use changeset::{failover_candidates, generate_failover_changes};

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{DnsService, ServiceContext};
use crate::types::{
    ActivityAction, ActivityEntry, ChangeBatch, FailoverOutcome, FailoverRequest, RejectReason,
    Site,
};

/// 故障切换服务
pub struct FailoverService {
    ctx: Arc<ServiceContext>,
    dns: DnsService,
}

impl FailoverService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            dns: DnsService::new(ctx.clone()),
            ctx,
        }
    }

    /// 把站点流量切换到 `request.destination`
    ///
    /// 只有站点不存在或读取站点失败时返回 `Err`；其余结果都以
    /// [`FailoverOutcome`] 表示。两种情况都会写入活动日志。
    pub async fn failover(&self, request: FailoverRequest) -> CoreResult<FailoverOutcome> {
        let site = match self.ctx.site_repository().find_by_id(&request.site_id).await {
            Ok(Some(site)) => site,
            Ok(None) => {
                log::warn!("Failover requested for unknown site {}", request.site_id);
                self.log_without_site(
                    &request,
                    format!("Failover requested for unknown site {}", request.site_id),
                )
                .await;
                return Err(CoreError::SiteNotFound(request.site_id.clone()));
            }
            Err(error) => {
                log::error!("Failed to load site {} for failover: {error}", request.site_id);
                self.log_without_site(
                    &request,
                    format!(
                        "Failover failed for site {}, error {error}",
                        request.site_id
                    ),
                )
                .await;
                return Err(error);
            }
        };

        // 读取时总是强制刷新，避免基于过期权重生成变更
        let records = match self
            .dns
            .get_records(&site.account_id, &site.zone_id, true)
            .await
        {
            Ok(records) => records,
            Err(error) => return Ok(self.fail(&site, request, error).await),
        };

        let candidates = failover_candidates(&records, &site.fqdn);
        if candidates.is_empty() {
            let reason = RejectReason::NoFailoverGroup {
                fqdn: site.fqdn.clone(),
            };
            return Ok(self
                .reject(
                    &site,
                    &request,
                    reason,
                    format!(
                        "No weighted failover records exist in AWS for site {} ({})",
                        site.fqdn, site.name
                    ),
                )
                .await);
        }

        let has_destination = candidates
            .iter()
            .any(|record| record.set_identifier.as_deref() == Some(request.destination.as_str()));
        if !has_destination {
            let reason = RejectReason::InvalidDestination {
                destination: request.destination.clone(),
            };
            return Ok(self
                .reject(
                    &site,
                    &request,
                    reason,
                    format!(
                        "Invalid failover destination '{}' for site {} ({})",
                        request.destination, site.fqdn, site.name
                    ),
                )
                .await);
        }

        let changes = match generate_failover_changes(&candidates, &request.destination) {
            Ok(changes) => changes,
            Err(reason) => {
                let message = format!("{reason} for site {} ({})", site.fqdn, site.name);
                return Ok(self.reject(&site, &request, reason, message).await);
            }
        };

        self.log(
            &site,
            &request,
            ActivityAction::Failover,
            format!(
                "Initiating failover of {} ({}), comment '{}'",
                site.fqdn, site.name, request.comment
            ),
        )
        .await;

        let batch = ChangeBatch {
            comment: Some(request.comment.clone()),
            changes,
        };
        match self
            .dns
            .update_records(&site.account_id, &site.zone_id, &batch)
            .await
        {
            Ok(info) => {
                log::info!(
                    "Failover of {} to '{}' submitted as change {}",
                    site.fqdn,
                    request.destination,
                    info.id
                );
                self.log(
                    &site,
                    &request,
                    ActivityAction::Failover,
                    format!("Failover complete for site {} ({})", site.fqdn, site.name),
                )
                .await;
                Ok(FailoverOutcome::Succeeded(info))
            }
            Err(error) => Ok(self.fail(&site, request, error).await),
        }
    }

    async fn reject(
        &self,
        site: &Site,
        request: &FailoverRequest,
        reason: RejectReason,
        message: String,
    ) -> FailoverOutcome {
        log::warn!("Failover rejected for site {}: {reason}", site.fqdn);
        self.log(site, request, ActivityAction::ErrorFailover, message)
            .await;
        FailoverOutcome::Rejected(reason)
    }

    async fn fail(&self, site: &Site, request: FailoverRequest, error: CoreError) -> FailoverOutcome {
        if error.is_expected() {
            log::warn!("Failover failed for site {}: {error}", site.fqdn);
        } else {
            log::error!("Failover failed for site {}: {error}", site.fqdn);
        }
        self.log(
            site,
            &request,
            ActivityAction::ErrorFailover,
            format!(
                "Failover failed for site {} ({}), error {error}",
                site.fqdn, site.name
            ),
        )
        .await;
        FailoverOutcome::Failed { request, error }
    }

    /// 站点无法解析时只能记到全局范围
    async fn log_without_site(&self, request: &FailoverRequest, message: String) {
        self.ctx
            .record_activity(
                ActivityEntry::system(&request.actor, ActivityAction::ErrorFailover, message)
                    .with_comment(&request.comment),
            )
            .await;
    }

    async fn log(
        &self,
        site: &Site,
        request: &FailoverRequest,
        action: ActivityAction,
        message: String,
    ) {
        self.ctx
            .record_activity(
                ActivityEntry::site(&site.id, &request.actor, action, message)
                    .with_comment(&request.comment),
            )
            .await;
    }
}
