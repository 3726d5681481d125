//! Application bootstrap for the DNS failover control plane.
//!
//! Provides `AppConfig` (TOML settings), `AppState` (service container) and
//! `AppStateBuilder` (adapter injection).

pub mod adapters;
mod config;

use std::sync::Arc;

use dns_failover_core::error::{CoreError, CoreResult};
use dns_failover_core::services::{
    AccountService, DnsService, FailoverService, ServiceContext, SiteService, ZoneIndexService,
};
use dns_failover_core::traits::{AccountRepository, ActivityLog, CredentialStore, SiteRepository};
use dns_failover_core::DnsCache;
use dns_failover_provider::{DnsGateway, IdentityVerifier, Route53Gateway, StsIdentityVerifier};

pub use config::{AppConfig, CacheSettings, GatewaySettings};

/// Application state.
///
/// Holds all services and the `ServiceContext`. Constructed once at startup via
/// `AppStateBuilder`.
pub struct AppState {
    /// Service context (storage adapters, gateway, cache)
    pub ctx: Arc<ServiceContext>,
    /// Configuration the state was built from
    pub config: AppConfig,
    pub account_service: AccountService,
    pub site_service: SiteService,
    /// Cached zone / record / health-check reads
    pub dns_service: DnsService,
    pub zone_index_service: ZoneIndexService,
    pub failover_service: FailoverService,
}

/// Builder for constructing `AppState`.
///
/// # Required adapters
/// - `account_repository`
/// - `credential_store`
/// - `site_repository`
/// - `activity_log`
///
/// # Optional
/// - `gateway`: defaults to `Route53Gateway` configured from `[gateway]`
/// - `identity_verifier`: defaults to `StsIdentityVerifier` configured from `[gateway]`
#[derive(Default)]
pub struct AppStateBuilder {
    config: AppConfig,
    account_repository: Option<Arc<dyn AccountRepository>>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    site_repository: Option<Arc<dyn SiteRepository>>,
    activity_log: Option<Arc<dyn ActivityLog>>,
    gateway: Option<Arc<dyn DnsGateway>>,
    identity_verifier: Option<Arc<dyn IdentityVerifier>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn account_repository(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    #[must_use]
    pub fn site_repository(mut self, repo: Arc<dyn SiteRepository>) -> Self {
        self.site_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn activity_log(mut self, log: Arc<dyn ActivityLog>) -> Self {
        self.activity_log = Some(log);
        self
    }

    #[must_use]
    pub fn gateway(mut self, gateway: Arc<dyn DnsGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    #[must_use]
    pub fn identity_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.identity_verifier = Some(verifier);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing, or
    /// `CoreError::Provider` if a default HTTP client cannot be created.
    pub fn build(self) -> CoreResult<AppState> {
        let account_repository = self.account_repository.ok_or_else(|| {
            CoreError::ValidationError("account_repository is required".to_string())
        })?;
        let credential_store = self.credential_store.ok_or_else(|| {
            CoreError::ValidationError("credential_store is required".to_string())
        })?;
        let site_repository = self.site_repository.ok_or_else(|| {
            CoreError::ValidationError("site_repository is required".to_string())
        })?;
        let activity_log = self
            .activity_log
            .ok_or_else(|| CoreError::ValidationError("activity_log is required".to_string()))?;

        let gateway_settings = &self.config.gateway;
        let gateway: Arc<dyn DnsGateway> = match self.gateway {
            Some(gateway) => gateway,
            None => {
                let mut builder = Route53Gateway::builder().max_retries(gateway_settings.max_retries);
                if let Some(timeout) = gateway_settings.request_timeout() {
                    builder = builder.request_timeout(timeout);
                }
                Arc::new(builder.build()?)
            }
        };
        let identity_verifier: Arc<dyn IdentityVerifier> = match self.identity_verifier {
            Some(verifier) => verifier,
            None => Arc::new(StsIdentityVerifier::with_options(
                gateway_settings.max_retries,
                gateway_settings.request_timeout(),
            )?),
        };

        log::info!(
            "Building application state (gateway: {}, cache TTLs: {:?})",
            gateway.id(),
            self.config.cache
        );

        let ctx = Arc::new(ServiceContext::new(
            account_repository,
            credential_store,
            site_repository,
            activity_log,
            gateway,
            identity_verifier,
            Arc::new(DnsCache::new(self.config.cache_config())),
        ));

        Ok(AppState {
            account_service: AccountService::new(Arc::clone(&ctx)),
            site_service: SiteService::new(Arc::clone(&ctx)),
            dns_service: DnsService::new(Arc::clone(&ctx)),
            zone_index_service: ZoneIndexService::new(Arc::clone(&ctx)),
            failover_service: FailoverService::new(Arc::clone(&ctx)),
            ctx,
            config: self.config,
        })
    }
}
