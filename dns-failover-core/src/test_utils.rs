//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dns_failover_provider::{
    DnsGateway, IdentityVerifier, ProviderError, Result as ProviderResult, MAX_HEALTH_CHECKS,
    MAX_HOSTED_ZONES, MAX_RECORD_SETS,
};
use tokio::sync::RwLock;

use crate::cache::DnsCache;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{AccountRepository, ActivityLog, CredentialStore, SiteRepository};
use crate::types::{
    Account, ActivityEntry, AwsCredentials, ChangeBatch, ChangeInfo, ChangeStatus, HealthCheck,
    HealthCheckConfig, HealthCheckObservation, HostedZone, RecordType, ResourceRecord,
    ResourceRecordSet, Site, StatusReport,
};

// ===== MockAccountRepository =====

pub struct MockAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
    /// 如果 Some，save 时返回此错误（用于测试 cleanup 路径）
    save_error: RwLock<Option<String>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_all(&self) -> CoreResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(accounts)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn save(&self, account: &Account) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.accounts.write().await.remove(id);
        Ok(())
    }
}

// ===== MockCredentialStore =====

pub struct MockCredentialStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    pub async fn secret(&self, account_id: &str) -> Option<String> {
        self.secrets.read().await.get(account_id).cloned()
    }

    pub async fn remove_secret(&self, account_id: &str) {
        self.secrets.write().await.remove(account_id);
    }

    pub async fn clear(&self) {
        self.secrets.write().await.clear();
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get(&self, account_id: &str) -> CoreResult<Option<String>> {
        Ok(self.secret(account_id).await)
    }

    async fn set(&self, account_id: &str, secret_access_key: &str) -> CoreResult<()> {
        self.secrets
            .write()
            .await
            .insert(account_id.to_string(), secret_access_key.to_string());
        Ok(())
    }

    async fn remove(&self, account_id: &str) -> CoreResult<()> {
        self.remove_secret(account_id).await;
        Ok(())
    }
}

// ===== MockSiteRepository =====

pub struct MockSiteRepository {
    sites: RwLock<HashMap<String, Site>>,
    /// 如果 Some，find_by_id 时返回此错误
    find_error: RwLock<Option<String>>,
}

impl MockSiteRepository {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(HashMap::new()),
            find_error: RwLock::new(None),
        }
    }

    pub async fn set_find_error(&self, err: Option<String>) {
        *self.find_error.write().await = err;
    }
}

#[async_trait]
impl SiteRepository for MockSiteRepository {
    async fn find_all(&self) -> CoreResult<Vec<Site>> {
        Ok(self.sites.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>> {
        if let Some(ref msg) = *self.find_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self.sites.read().await.get(id).cloned())
    }

    async fn save(&self, site: &Site) -> CoreResult<()> {
        self.sites
            .write()
            .await
            .insert(site.id.clone(), site.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.sites.write().await.remove(id);
        Ok(())
    }
}

// ===== RecordingActivityLog =====

pub struct RecordingActivityLog {
    entries: RwLock<Vec<ActivityEntry>>,
    fail: AtomicBool,
}

impl RecordingActivityLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ActivityLog for RecordingActivityLog {
    async fn record(&self, entry: &ActivityEntry) -> CoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::StorageError("activity log unavailable".into()));
        }
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}

// ===== MockGateway =====

/// 各网关操作的调用次数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GatewayCalls {
    pub list_hosted_zones: usize,
    pub list_resource_record_sets: usize,
    pub list_health_checks: usize,
    pub get_health_check_status: usize,
    pub change_resource_record_sets: usize,
}

/// 内存网关：区域和健康检查以 access key 区分账户，记录以 zone id 为键
pub struct MockGateway {
    zones: RwLock<HashMap<String, Vec<HostedZone>>>,
    records: RwLock<HashMap<String, Vec<ResourceRecordSet>>>,
    health_checks: RwLock<HashMap<String, Vec<HealthCheck>>>,
    submitted: RwLock<Vec<(String, ChangeBatch)>>,
    truncate_zones: AtomicBool,
    truncate_records: AtomicBool,
    truncate_health_checks: AtomicBool,
    fail_changes: AtomicBool,
    list_hosted_zones: AtomicUsize,
    list_resource_record_sets: AtomicUsize,
    list_health_checks: AtomicUsize,
    get_health_check_status: AtomicUsize,
    change_resource_record_sets: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            records: RwLock::new(HashMap::new()),
            health_checks: RwLock::new(HashMap::new()),
            submitted: RwLock::new(Vec::new()),
            truncate_zones: AtomicBool::new(false),
            truncate_records: AtomicBool::new(false),
            truncate_health_checks: AtomicBool::new(false),
            fail_changes: AtomicBool::new(false),
            list_hosted_zones: AtomicUsize::new(0),
            list_resource_record_sets: AtomicUsize::new(0),
            list_health_checks: AtomicUsize::new(0),
            get_health_check_status: AtomicUsize::new(0),
            change_resource_record_sets: AtomicUsize::new(0),
        }
    }

    pub async fn add_zone(&self, access_key_id: &str, zone_id: &str, name: &str) {
        self.zones
            .write()
            .await
            .entry(access_key_id.to_string())
            .or_default()
            .push(HostedZone {
                id: zone_id.to_string(),
                name: name.to_string(),
                caller_reference: format!("ref-{zone_id}"),
                config: None,
                resource_record_set_count: None,
            });
    }

    /// 替换区域中的全部记录
    pub async fn add_records(&self, zone_id: &str, records: Vec<ResourceRecordSet>) {
        self.records
            .write()
            .await
            .insert(zone_id.to_string(), records);
    }

    pub async fn add_health_check(&self, access_key_id: &str, id: &str) {
        self.health_checks
            .write()
            .await
            .entry(access_key_id.to_string())
            .or_default()
            .push(HealthCheck {
                id: id.to_string(),
                caller_reference: format!("ref-{id}"),
                config: HealthCheckConfig {
                    check_type: "HTTPS".to_string(),
                    ..Default::default()
                },
                version: 1,
            });
    }

    pub fn set_truncate_zones(&self, truncate: bool) {
        self.truncate_zones.store(truncate, Ordering::SeqCst);
    }

    pub fn set_truncate_records(&self, truncate: bool) {
        self.truncate_records.store(truncate, Ordering::SeqCst);
    }

    pub fn set_truncate_health_checks(&self, truncate: bool) {
        self.truncate_health_checks.store(truncate, Ordering::SeqCst);
    }

    pub fn set_fail_changes(&self, fail: bool) {
        self.fail_changes.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> GatewayCalls {
        GatewayCalls {
            list_hosted_zones: self.list_hosted_zones.load(Ordering::SeqCst),
            list_resource_record_sets: self.list_resource_record_sets.load(Ordering::SeqCst),
            list_health_checks: self.list_health_checks.load(Ordering::SeqCst),
            get_health_check_status: self.get_health_check_status.load(Ordering::SeqCst),
            change_resource_record_sets: self.change_resource_record_sets.load(Ordering::SeqCst),
        }
    }

    /// 已提交的 (zone id, 变更批次)
    pub async fn submitted(&self) -> Vec<(String, ChangeBatch)> {
        self.submitted.read().await.clone()
    }
}

fn truncated(resource: &str, limit: u32) -> ProviderError {
    ProviderError::Truncated {
        provider: "mock".to_string(),
        resource: resource.to_string(),
        limit,
    }
}

#[async_trait]
impl DnsGateway for MockGateway {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_hosted_zones(
        &self,
        credentials: &AwsCredentials,
    ) -> ProviderResult<Vec<HostedZone>> {
        self.list_hosted_zones.fetch_add(1, Ordering::SeqCst);
        if self.truncate_zones.load(Ordering::SeqCst) {
            return Err(truncated("hosted zones", MAX_HOSTED_ZONES));
        }
        Ok(self
            .zones
            .read()
            .await
            .get(&credentials.access_key_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_resource_record_sets(
        &self,
        _credentials: &AwsCredentials,
        zone_id: &str,
    ) -> ProviderResult<Vec<ResourceRecordSet>> {
        self.list_resource_record_sets.fetch_add(1, Ordering::SeqCst);
        if self.truncate_records.load(Ordering::SeqCst) {
            return Err(truncated("resource record sets", MAX_RECORD_SETS));
        }
        Ok(self
            .records
            .read()
            .await
            .get(zone_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_health_checks(
        &self,
        credentials: &AwsCredentials,
    ) -> ProviderResult<Vec<HealthCheck>> {
        self.list_health_checks.fetch_add(1, Ordering::SeqCst);
        if self.truncate_health_checks.load(Ordering::SeqCst) {
            return Err(truncated("health checks", MAX_HEALTH_CHECKS));
        }
        Ok(self
            .health_checks
            .read()
            .await
            .get(&credentials.access_key_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_health_check_status(
        &self,
        _credentials: &AwsCredentials,
        _health_check_id: &str,
    ) -> ProviderResult<Vec<HealthCheckObservation>> {
        self.get_health_check_status.fetch_add(1, Ordering::SeqCst);
        Ok(vec![HealthCheckObservation {
            region: Some("us-east-1".to_string()),
            ip_address: Some("192.0.2.10".to_string()),
            status_report: Some(StatusReport {
                status: "Success: HTTP Status Code 200, OK".to_string(),
                checked_time: None,
            }),
        }])
    }

    async fn change_resource_record_sets(
        &self,
        _credentials: &AwsCredentials,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> ProviderResult<ChangeInfo> {
        let n = self.change_resource_record_sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_changes.load(Ordering::SeqCst) {
            return Err(ProviderError::NetworkError {
                provider: "mock".to_string(),
                detail: "connection reset".to_string(),
            });
        }
        self.submitted
            .write()
            .await
            .push((zone_id.to_string(), batch.clone()));
        Ok(ChangeInfo {
            id: format!("C{n:04}"),
            status: ChangeStatus::Pending,
            submitted_at: Utc::now().to_rfc3339(),
            comment: batch.comment.clone(),
        })
    }
}

// ===== MockIdentityVerifier =====

/// access key -> account id；未注册的 key 视为无效凭证
pub struct MockIdentityVerifier {
    identities: RwLock<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl MockIdentityVerifier {
    pub fn new() -> Self {
        Self {
            identities: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn add(&self, access_key_id: &str, account_id: &str) {
        self.identities
            .write()
            .await
            .insert(access_key_id.to_string(), account_id.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for MockIdentityVerifier {
    async fn verify_identity(&self, credentials: &AwsCredentials) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identities
            .read()
            .await
            .get(&credentials.access_key_id)
            .cloned()
            .ok_or_else(|| ProviderError::InvalidCredentials {
                provider: "mock".to_string(),
                raw_message: None,
            })
    }
}

// ===== 工厂方法 =====

/// 测试用上下文以及所有 mock 的句柄
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub account_repository: Arc<MockAccountRepository>,
    pub credential_store: Arc<MockCredentialStore>,
    pub site_repository: Arc<MockSiteRepository>,
    pub activity_log: Arc<RecordingActivityLog>,
    pub gateway: Arc<MockGateway>,
    pub identity: Arc<MockIdentityVerifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        let account_repository = Arc::new(MockAccountRepository::new());
        let credential_store = Arc::new(MockCredentialStore::new());
        let site_repository = Arc::new(MockSiteRepository::new());
        let activity_log = Arc::new(RecordingActivityLog::new());
        let gateway = Arc::new(MockGateway::new());
        let identity = Arc::new(MockIdentityVerifier::new());

        let ctx = Arc::new(ServiceContext::new(
            account_repository.clone(),
            credential_store.clone(),
            site_repository.clone(),
            activity_log.clone(),
            gateway.clone(),
            identity.clone(),
            Arc::new(DnsCache::default()),
        ));

        Self {
            ctx,
            account_repository,
            credential_store,
            site_repository,
            activity_log,
            gateway,
            identity,
        }
    }

    /// 直接写入账户（以及可选的 secret），不经过身份校验
    pub async fn add_account(
        &self,
        id: &str,
        name: &str,
        access_key_id: &str,
        secret: Option<&str>,
    ) -> Account {
        let now = Utc::now();
        let account = Account {
            id: id.to_string(),
            name: name.to_string(),
            access_key_id: access_key_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.account_repository.save(&account).await.unwrap();
        if let Some(secret) = secret {
            self.credential_store.set(id, secret).await.unwrap();
        }
        account
    }

    pub async fn add_site(&self, site: Site) {
        self.site_repository.save(&site).await.unwrap();
    }
}

/// 构造一条记录（TTL 60，值 192.0.2.1）
pub fn record(
    name: &str,
    record_type: RecordType,
    set_identifier: Option<&str>,
    weight: Option<u64>,
) -> ResourceRecordSet {
    ResourceRecordSet {
        name: name.to_string(),
        record_type,
        set_identifier: set_identifier.map(str::to_string),
        weight,
        ttl: Some(60),
        health_check_id: None,
        resource_records: vec![ResourceRecord::new("192.0.2.1")],
        alias_target: None,
    }
}

/// 构造站点；名称与 ID 相同
pub fn site(id: &str, fqdn: &str, account_id: &str, zone_id: &str) -> Site {
    Site {
        id: id.to_string(),
        name: id.to_string(),
        fqdn: fqdn.to_string(),
        account_id: account_id.to_string(),
        zone_id: zone_id.to_string(),
        notif_email: None,
        notif_teams: None,
        monitoring_link: None,
        enabled: true,
        created_at: Utc::now(),
    }
}
