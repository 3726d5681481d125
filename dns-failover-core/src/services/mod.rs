//! 业务逻辑服务层

mod account_service;
mod dns_service;
mod failover;
mod site_service;
mod zone_index_service;

pub use account_service::AccountService;
pub use dns_service::DnsService;
pub use failover::{failover_candidates, generate_failover_changes, FailoverService};
pub use site_service::SiteService;
pub use zone_index_service::{find_zone_owner, ZoneIndexService};

use std::sync::Arc;

use dns_failover_provider::{DnsGateway, IdentityVerifier};

use crate::cache::DnsCache;
use crate::error::{CoreError, CoreResult};
use crate::traits::{AccountRepository, ActivityLog, CredentialStore, SiteRepository};
use crate::types::{ActivityEntry, AwsCredentials};

/// 服务上下文 - 持有所有依赖
///
/// 应用层创建此上下文，注入存储实现、网关和缓存。
pub struct ServiceContext {
    account_repository: Arc<dyn AccountRepository>,
    credential_store: Arc<dyn CredentialStore>,
    site_repository: Arc<dyn SiteRepository>,
    activity_log: Arc<dyn ActivityLog>,
    gateway: Arc<dyn DnsGateway>,
    identity_verifier: Arc<dyn IdentityVerifier>,
    cache: Arc<DnsCache>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        credential_store: Arc<dyn CredentialStore>,
        site_repository: Arc<dyn SiteRepository>,
        activity_log: Arc<dyn ActivityLog>,
        gateway: Arc<dyn DnsGateway>,
        identity_verifier: Arc<dyn IdentityVerifier>,
        cache: Arc<DnsCache>,
    ) -> Self {
        Self {
            account_repository,
            credential_store,
            site_repository,
            activity_log,
            gateway,
            identity_verifier,
            cache,
        }
    }

    pub fn account_repository(&self) -> &dyn AccountRepository {
        self.account_repository.as_ref()
    }

    pub fn credential_store(&self) -> &dyn CredentialStore {
        self.credential_store.as_ref()
    }

    pub fn site_repository(&self) -> &dyn SiteRepository {
        self.site_repository.as_ref()
    }

    pub fn gateway(&self) -> &dyn DnsGateway {
        self.gateway.as_ref()
    }

    pub fn identity_verifier(&self) -> &dyn IdentityVerifier {
        self.identity_verifier.as_ref()
    }

    pub fn cache(&self) -> &DnsCache {
        &self.cache
    }

    /// 解析账户凭证
    ///
    /// 账户不存在返回 `AccountNotFound`；账户存在但没有 secret key 返回 `MissingCredential`。
    pub async fn resolve_credentials(&self, account_id: &str) -> CoreResult<AwsCredentials> {
        let account = self
            .account_repository
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;

        let secret = self
            .credential_store
            .get(account_id)
            .await?
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                log::error!("Account {account_id} has no stored secret key");
                CoreError::MissingCredential(account_id.to_string())
            })?;

        Ok(AwsCredentials::new(account.access_key_id, secret))
    }

    /// 写入活动日志；失败只记录日志，不影响调用方
    pub async fn record_activity(&self, entry: ActivityEntry) {
        if let Err(e) = self.activity_log.record(&entry).await {
            log::error!(
                "Failed to record {} activity '{}': {e}",
                entry.action,
                entry.message
            );
        }
    }
}
