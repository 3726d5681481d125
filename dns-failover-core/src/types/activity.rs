//! 活动日志类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 系统自身产生的日志条目所用的操作者
pub const SYSTEM_ACTOR: &str = "SYSTEM";

/// 活动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityAction {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "FAILOVER")]
    Failover,
    #[serde(rename = "ERROR-FAILOVER")]
    ErrorFailover,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "FLUSH-CACHE")]
    FlushCache,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Failover => "FAILOVER",
            Self::ErrorFailover => "ERROR-FAILOVER",
            Self::Error => "ERROR",
            Self::FlushCache => "FLUSH-CACHE",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 日志条目归属
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "siteId", rename_all = "camelCase")]
pub enum ActivityScope {
    /// 全局（账户管理、缓存、系统错误）
    System,
    /// 某个站点
    Site(String),
}

/// 活动日志条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub scope: ActivityScope,
    /// 操作者
    pub actor: String,
    pub action: ActivityAction,
    pub message: String,
    /// 运维人员填写的备注（故障切换）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    /// 全局条目
    pub fn system(actor: &str, action: ActivityAction, message: impl Into<String>) -> Self {
        Self {
            scope: ActivityScope::System,
            actor: actor.to_string(),
            action,
            message: message.into(),
            comment: None,
            timestamp: Utc::now(),
        }
    }

    /// 站点条目
    pub fn site(
        site_id: &str,
        actor: &str,
        action: ActivityAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            scope: ActivityScope::Site(site_id.to_string()),
            ..Self::system(actor, action, message)
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// 站点 ID（全局条目返回 `None`）
    pub fn site_id(&self) -> Option<&str> {
        match &self.scope {
            ActivityScope::Site(id) => Some(id),
            ActivityScope::System => None,
        }
    }
}
