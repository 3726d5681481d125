//! 故障切换类型定义

use serde::{Deserialize, Serialize};

use dns_failover_provider::ChangeInfo;

use crate::error::CoreError;

/// 故障切换请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailoverRequest {
    pub site_id: String,
    /// 目标端点的 set identifier
    pub destination: String,
    /// 运维备注，同时作为变更批次的 comment
    pub comment: String,
    /// 操作者
    pub actor: String,
}

/// 拒绝原因（未提交任何变更）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum RejectReason {
    /// 站点下没有加权的 A/AAAA/CNAME 记录
    NoFailoverGroup { fqdn: String },
    /// 目标不是任何记录的 set identifier
    InvalidDestination { destination: String },
    /// 生成的变更中没有权重为 100 的记录
    NoActiveEndpoint { destination: String },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFailoverGroup { fqdn } => {
                write!(f, "no weighted failover records exist for {fqdn}")
            }
            Self::InvalidDestination { destination } => {
                write!(f, "invalid failover destination '{destination}'")
            }
            Self::NoActiveEndpoint { destination } => {
                write!(
                    f,
                    "failover changes for '{destination}' resulted in no active record"
                )
            }
        }
    }
}

/// 故障切换终态
#[derive(Debug)]
pub enum FailoverOutcome {
    /// 变更已提交
    Succeeded(ChangeInfo),
    /// 校验未通过，未提交
    Rejected(RejectReason),
    /// 读取或提交失败；保留原始请求和错误
    Failed {
        request: FailoverRequest,
        error: CoreError,
    },
}

impl FailoverOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// 转换为 `Result`，拒绝和失败都成为错误
    pub fn into_result(self) -> Result<ChangeInfo, CoreError> {
        match self {
            Self::Succeeded(info) => Ok(info),
            Self::Rejected(reason) => Err(CoreError::Rejected(reason)),
            Self::Failed { error, .. } => Err(error),
        }
    }
}
