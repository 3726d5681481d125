//! 账户相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 账户信息
///
/// `id` 是 STS 返回的 AWS 账号 ID，从不在本地生成。Secret key 单独保存在
/// [`CredentialStore`](crate::traits::CredentialStore) 中。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// AWS 账号 ID
    pub id: String,
    /// 账户名称
    pub name: String,
    /// Access key ID
    pub access_key_id: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 创建账户请求
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// 账户名称
    pub name: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// 更新账户请求
///
/// 全部为 `None` 时账户保持不变；更换 access key 时必须同时提供 secret key。
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// 新的账户名称（可选）
    pub name: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl UpdateAccountRequest {
    /// 是否没有任何需要更新的字段
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.access_key_id.is_none() && self.secret_access_key.is_none()
    }
}

impl std::fmt::Debug for CreateAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAccountRequest")
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

impl std::fmt::Debug for UpdateAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateAccountRequest")
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}
