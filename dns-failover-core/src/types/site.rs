//! 站点相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 站点：某个账户托管区域中的一个 FQDN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// 站点 ID (UUID)
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 完整域名，带末尾的点（`www.example.com.`）
    pub fqdn: String,
    /// 所属账户
    pub account_id: String,
    /// 托管区域 ID（无 `/hostedzone/` 前缀）
    pub zone_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notif_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notif_teams: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitoring_link: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// 注册站点请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteRequest {
    pub name: String,
    pub fqdn: String,
    pub zone_id: String,
    #[serde(default)]
    pub notif_email: Option<String>,
    #[serde(default)]
    pub notif_teams: Option<String>,
    #[serde(default)]
    pub monitoring_link: Option<String>,
}

/// Route 53 在记录名中返回的通配符转义
const WILDCARD_ESCAPE: &str = "\\052";

/// 规范化 FQDN：去空白、小写、补齐末尾的点
///
/// `*` 写成 Route 53 返回的 `\052` 形式，通配符站点才能与记录名直接比较。
pub fn normalize_fqdn(fqdn: &str) -> String {
    let trimmed = fqdn.trim().to_ascii_lowercase().replace('*', WILDCARD_ESCAPE);
    if trimmed.ends_with('.') {
        trimmed
    } else {
        format!("{trimmed}.")
    }
}
