//! Account persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Account;

/// Account metadata repository
///
/// Holds everything about an account except its secret key, which lives in the
/// [`CredentialStore`](super::CredentialStore).
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Get all accounts
    async fn find_all(&self) -> CoreResult<Vec<Account>>;

    /// Get account based on ID
    ///
    /// # Arguments
    /// * `id` - AWS account ID
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Account>>;

    /// Save account (new or update)
    async fn save(&self, account: &Account) -> CoreResult<()>;

    /// Delete account
    async fn delete(&self, id: &str) -> CoreResult<()>;
}
