//! Account management service
//!
//! The account id is never generated locally: it is the AWS account the credentials
//! resolve to through [`IdentityVerifier`](dns_failover_provider::IdentityVerifier).

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    Account, ActivityAction, ActivityEntry, AwsCredentials, CreateAccountRequest,
    UpdateAccountRequest,
};

/// Account management service
pub struct AccountService {
    ctx: Arc<ServiceContext>,
}

impl AccountService {
    /// Create an account service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> CoreResult<Vec<Account>> {
        self.ctx.account_repository().find_all().await
    }

    /// Get account based on ID
    pub async fn get_account(&self, account_id: &str) -> CoreResult<Option<Account>> {
        self.ctx.account_repository().find_by_id(account_id).await
    }

    /// Create account
    ///
    /// Complete process: check name -> resolve account id -> check id -> save secret ->
    /// save metadata. If saving metadata fails the stored secret is cleaned up.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
        actor: &str,
    ) -> CoreResult<Account> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::ValidationError("Account name is required".into()));
        }
        if request.access_key_id.is_empty() || request.secret_access_key.is_empty() {
            return Err(CoreError::ValidationError(
                "Both access key ID and secret access key are required".into(),
            ));
        }

        // 1. Unique name
        let accounts = self.ctx.account_repository().find_all().await?;
        if accounts.iter().any(|a| a.name == name) {
            return Err(CoreError::Conflict(format!("Account {name} already exists")));
        }

        // 2. Resolve the account id from the credentials
        let credentials =
            AwsCredentials::new(request.access_key_id.clone(), request.secret_access_key);
        let account_id = self.verify(&credentials).await?;

        // 3. Unique account id
        if let Some(existing) = accounts.iter().find(|a| a.id == account_id) {
            return Err(CoreError::Conflict(format!(
                "Account {} ({}) already exists",
                existing.id, existing.name
            )));
        }

        // 4. Save the secret
        log::info!("Saving credentials for account: {account_id}");
        self.ctx
            .credential_store()
            .set(&account_id, &credentials.secret_access_key)
            .await?;

        // 5. Save metadata and cleanup if failed
        let now = Utc::now();
        let account = Account {
            id: account_id.clone(),
            name,
            access_key_id: request.access_key_id,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.ctx.account_repository().save(&account).await {
            log::error!("Failed to save account metadata, cleaning up: {e}");
            if let Err(cleanup_err) = self.ctx.credential_store().remove(&account_id).await {
                log::warn!("Cleanup: failed to delete credentials for {account_id}: {cleanup_err}");
            }
            self.record(
                actor,
                ActivityAction::Error,
                format!(
                    "Error inserting account {account_id} ({}) into database",
                    account.name
                ),
            )
            .await;
            return Err(e);
        }

        self.record(
            actor,
            ActivityAction::Create,
            format!("Created new account config for {} ({})", account.id, account.name),
        )
        .await;
        Ok(account)
    }

    /// Update account
    ///
    /// Supports updating the name and/or the key pair. New credentials must resolve to
    /// the same AWS account; a secret without an access key rotates the secret of the
    /// current key.
    pub async fn update_account(
        &self,
        account_id: &str,
        request: UpdateAccountRequest,
        actor: &str,
    ) -> CoreResult<Account> {
        // 1. Get an existing account
        let mut account = self
            .ctx
            .account_repository()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;

        if request.is_empty() {
            return Ok(account);
        }
        if request.access_key_id.is_some() && request.secret_access_key.is_none() {
            return Err(CoreError::ValidationError(
                "Access key ID must be accompanied by a secret access key".into(),
            ));
        }

        // 2. Validate the new name before touching credentials
        let new_name = match request.name.as_deref().map(str::trim) {
            Some("") => {
                return Err(CoreError::ValidationError("Account name is required".into()));
            }
            Some(name) => {
                let accounts = self.ctx.account_repository().find_all().await?;
                if accounts.iter().any(|a| a.id != account.id && a.name == name) {
                    return Err(CoreError::Conflict(format!("Account {name} already exists")));
                }
                Some(name.to_string())
            }
            None => None,
        };

        // 3. If new credentials are provided, verify and update
        let old_secret = if let Some(secret) = request.secret_access_key {
            let access_key_id = request
                .access_key_id
                .unwrap_or_else(|| account.access_key_id.clone());
            let credentials = AwsCredentials::new(access_key_id.clone(), secret);

            let resolved_id = self.verify(&credentials).await?;
            if resolved_id != account.id {
                return Err(CoreError::Conflict(format!(
                    "Access key {access_key_id} belongs to account {resolved_id}, not {}",
                    account.id
                )));
            }

            // Back up old secret for rollback
            let old_secret = self.ctx.credential_store().get(account_id).await?;

            log::info!("Updating credentials for account: {account_id}");
            self.ctx
                .credential_store()
                .set(account_id, &credentials.secret_access_key)
                .await?;
            account.access_key_id = access_key_id;
            old_secret
        } else {
            None
        };

        if let Some(name) = new_name {
            account.name = name;
        }
        account.updated_at = Utc::now();

        // 4. Save the updated account and roll back the secret if it fails
        if let Err(e) = self.ctx.account_repository().save(&account).await {
            if let Some(old_secret) = old_secret {
                log::warn!("Rolling back credentials for account: {account_id}");
                if let Err(rollback_err) = self
                    .ctx
                    .credential_store()
                    .set(account_id, &old_secret)
                    .await
                {
                    log::error!("Failed to rollback credentials for {account_id}: {rollback_err}");
                }
            }
            self.record(
                actor,
                ActivityAction::Error,
                format!(
                    "Error updating account {account_id} ({}) in database: {e}",
                    account.name
                ),
            )
            .await;
            return Err(e);
        }

        self.record(
            actor,
            ActivityAction::Update,
            format!("Updated account config for {} ({})", account.id, account.name),
        )
        .await;
        Ok(account)
    }

    /// Delete account
    ///
    /// Removes the secret first, then the metadata.
    pub async fn delete_account(&self, account_id: &str, actor: &str) -> CoreResult<()> {
        let account = self
            .ctx
            .account_repository()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;

        let result = async {
            self.ctx.credential_store().remove(account_id).await?;
            self.ctx.account_repository().delete(account_id).await
        }
        .await;

        if let Err(e) = result {
            log::error!("Failed to delete account {account_id}: {e}");
            self.record(
                actor,
                ActivityAction::Error,
                format!("Failed to delete account {account_id} ({})", account.name),
            )
            .await;
            return Err(e);
        }

        self.record(
            actor,
            ActivityAction::Delete,
            format!("Deleted account {account_id} ({})", account.name),
        )
        .await;
        Ok(())
    }

    /// Resolve the AWS account id for a key pair
    async fn verify(&self, credentials: &AwsCredentials) -> CoreResult<String> {
        self.ctx
            .identity_verifier()
            .verify_identity(credentials)
            .await
            .map_err(|e| {
                log::warn!(
                    "Identity check failed for access key {}: {e}",
                    credentials.access_key_id
                );
                CoreError::Provider(e)
            })
    }

    async fn record(&self, actor: &str, action: ActivityAction, message: String) {
        self.ctx
            .record_activity(ActivityEntry::system(actor, action, message))
            .await;
    }
}
