use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    AwsCredentials, ChangeBatch, ChangeInfo, HealthCheck, HealthCheckObservation, HostedZone,
    ResourceRecordSet,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（`NoSuchHostedZone`、`Throttling` 等）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 托管区域 ID（用于 `HostedZoneNotFound`）
    pub zone_id: Option<String>,
    /// 健康检查 ID（用于 `HealthCheckNotFound`）
    pub health_check_id: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone_id: &str) -> Self {
        Self {
            zone_id: Some(zone_id.to_string()),
            ..Self::default()
        }
    }

    pub fn health_check(health_check_id: &str) -> Self {
        Self {
            health_check_id: Some(health_check_id.to_string()),
            ..Self::default()
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 将 AWS 原始错误码映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Remote DNS gateway.
///
/// Every call carries the credentials of the account it acts for. Implementations must
/// fail with [`ProviderError::Truncated`] instead of returning a partial listing, and must
/// treat an absent collection in a response as empty.
#[async_trait]
pub trait DnsGateway: Send + Sync {
    /// 网关标识符
    fn id(&self) -> &'static str;

    /// Lists the account's hosted zones (at most [`MAX_HOSTED_ZONES`](crate::MAX_HOSTED_ZONES)).
    async fn list_hosted_zones(&self, credentials: &AwsCredentials) -> Result<Vec<HostedZone>>;

    /// Lists the record sets of one zone (at most [`MAX_RECORD_SETS`](crate::MAX_RECORD_SETS)).
    async fn list_resource_record_sets(
        &self,
        credentials: &AwsCredentials,
        zone_id: &str,
    ) -> Result<Vec<ResourceRecordSet>>;

    /// Lists the account's health checks (at most [`MAX_HEALTH_CHECKS`](crate::MAX_HEALTH_CHECKS)).
    async fn list_health_checks(&self, credentials: &AwsCredentials) -> Result<Vec<HealthCheck>>;

    /// Returns the latest observation of every checker for one health check.
    async fn get_health_check_status(
        &self,
        credentials: &AwsCredentials,
        health_check_id: &str,
    ) -> Result<Vec<HealthCheckObservation>>;

    /// Submits a change batch against one zone.
    async fn change_resource_record_sets(
        &self,
        credentials: &AwsCredentials,
        zone_id: &str,
        batch: &ChangeBatch,
    ) -> Result<ChangeInfo>;
}

/// Resolves which account a credential pair belongs to.
///
/// Used when an account is created or its keys are rotated, so the stored account ID
/// always matches the identity of its credentials.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Returns the account ID owning `credentials`.
    async fn verify_identity(&self, credentials: &AwsCredentials) -> Result<String>;
}
