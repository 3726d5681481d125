//! 跨账户托管区域索引

use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::{CoreError, CoreResult};
use crate::services::{DnsService, ServiceContext};
use crate::types::AccountZonesIndex;

/// 在索引中查找拥有某个托管区域的账户
pub fn find_zone_owner<'a>(index: &'a AccountZonesIndex, zone_id: &str) -> Option<&'a str> {
    index
        .iter()
        .find(|(_, zones)| zones.contains_key(zone_id))
        .map(|(account_id, _)| account_id.as_str())
}

/// 托管区域索引服务
pub struct ZoneIndexService {
    ctx: Arc<ServiceContext>,
    dns: DnsService,
}

impl ZoneIndexService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            dns: DnsService::new(ctx.clone()),
            ctx,
        }
    }

    /// 构建 account id -> zone id -> zone 索引
    ///
    /// 并发拉取每个账户的托管区域，任一账户失败则整体失败。
    pub async fn get_zone_index(&self, force: bool) -> CoreResult<AccountZonesIndex> {
        let accounts = self.ctx.account_repository().find_all().await?;
        log::debug!("Building zone index for {} account(s)", accounts.len());

        let fetches = accounts.iter().map(|account| async move {
            let zones = self.dns.get_hosted_zones(&account.id, force).await?;
            Ok::<_, CoreError>((account.id.clone(), zones))
        });

        Ok(try_join_all(fetches).await?.into_iter().collect())
    }

    /// 查找托管区域所属的账户
    pub async fn find_account_for_zone(&self, zone_id: &str) -> CoreResult<String> {
        let index = self.get_zone_index(false).await?;
        find_zone_owner(&index, zone_id)
            .map(str::to_string)
            .ok_or_else(|| CoreError::HostedZoneNotFound(zone_id.to_string()))
    }
}
