//! 凭证存储抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// 凭证存储 Trait
///
/// 只保存 secret access key，以账户 ID 为键。Access key ID 属于账户元数据。
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 获取单个账户的 secret key
    ///
    /// # Returns
    /// * `Ok(Some(secret))` - 凭证存在
    /// * `Ok(None)` - 凭证不存在
    async fn get(&self, account_id: &str) -> CoreResult<Option<String>>;

    /// 设置单个账户的 secret key
    async fn set(&self, account_id: &str, secret_access_key: &str) -> CoreResult<()>;

    /// 删除凭证
    async fn remove(&self, account_id: &str) -> CoreResult<()>;
}
