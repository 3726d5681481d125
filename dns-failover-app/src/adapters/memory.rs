//! In-memory storage adapters.
//!
//! Nothing is persisted; contents are lost when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dns_failover_core::error::CoreResult;
use dns_failover_core::traits::{AccountRepository, ActivityLog, CredentialStore, SiteRepository};
use dns_failover_core::types::{Account, ActivityEntry, Site};

/// Account repository backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_all(&self) -> CoreResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn save(&self, account: &Account) -> CoreResult<()> {
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

/// Secret keys by account id.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, account_id: &str) -> CoreResult<Option<String>> {
        Ok(self.secrets.read().await.get(account_id).cloned())
    }

    async fn set(&self, account_id: &str, secret_access_key: &str) -> CoreResult<()> {
        self.secrets
            .write()
            .await
            .insert(account_id.to_string(), secret_access_key.to_string());
        Ok(())
    }

    async fn remove(&self, account_id: &str) -> CoreResult<()> {
        self.secrets.write().await.remove(account_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySiteRepository {
    sites: RwLock<HashMap<String, Site>>,
}

impl InMemorySiteRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SiteRepository for InMemorySiteRepository {
    async fn find_all(&self) -> CoreResult<Vec<Site>> {
        let mut sites: Vec<Site> = self.sites.read().await.values().cloned().collect();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>> {
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

/// Append-only activity log; every entry is also written to the `log` facade.
#[derive(Default)]
pub struct InMemoryActivityLog {
    entries: RwLock<Vec<ActivityEntry>>,
}

impl InMemoryActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first.
    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().await.clone()
    }

    /// Entries recorded against one site.
    pub async fn entries_for_site(&self, site_id: &str) -> Vec<ActivityEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.site_id() == Some(site_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record(&self, entry: &ActivityEntry) -> CoreResult<()> {
        log::info!(
            "[activity] {} {} {}: {}",
            entry.site_id().unwrap_or("-"),
            entry.actor,
            entry.action,
            entry.message
        );
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}
