//! Route 53 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>
//!
//! ## 错误码分类
//!
//! - **认证错误**：`InvalidClientTokenId`, `SignatureDoesNotMatch`, `IncompleteSignature`,
//!   `MissingAuthenticationToken`, `ExpiredToken`
//! - **权限拒绝**：`AccessDenied`, `AccessDeniedException`
//! - **频率限制**：`Throttling`, `ThrottlingException`, `PriorRequestNotComplete`
//! - **资源不存在**：`NoSuchHostedZone`, `NoSuchHealthCheck`
//! - **变更被拒**：`InvalidChangeBatch`
//! - **参数错误**：`InvalidInput`, `InvalidArgument`, `InvalidDomainName`, `InvalidPaginationToken`
//! - **服务端错误**：`InternalFailure`, `ServiceUnavailable`

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Gateway;

/// Route 53 错误码映射实现
impl ProviderErrorMapper for Route53Gateway {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        map_aws_error(self.provider_name(), raw, context)
            .unwrap_or_else(|raw| self.unknown_error(raw))
    }
}

/// 映射 AWS 通用错误码（Route 53 与 STS 共用）
///
/// 未识别的错误码原样返回，由调用方 fallback 到 `Unknown`。
pub(crate) fn map_aws_error(
    provider: &str,
    raw: RawApiError,
    context: ErrorContext,
) -> Result<ProviderError, RawApiError> {
    let provider = provider.to_string();
    let mapped = match raw.code.as_deref() {
        // ============ 认证错误 ============
        Some(
            "InvalidClientTokenId"
            | "SignatureDoesNotMatch"
            | "IncompleteSignature"
            | "MissingAuthenticationToken"
            | "ExpiredToken"
            | "UnrecognizedClientException",
        ) => ProviderError::InvalidCredentials {
            provider,
            raw_message: Some(raw.message),
        },

        // ============ 权限拒绝 ============
        Some("AccessDenied" | "AccessDeniedException" | "NotAuthorized") => {
            ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            }
        }

        // ============ 频率限制 ============
        Some("Throttling" | "ThrottlingException" | "PriorRequestNotComplete") => {
            ProviderError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(raw.message),
            }
        }

        // ============ 资源不存在 ============
        Some("NoSuchHostedZone") => ProviderError::HostedZoneNotFound {
            provider,
            zone_id: context.zone_id.unwrap_or_default(),
            raw_message: Some(raw.message),
        },
        Some("NoSuchHealthCheck") => ProviderError::HealthCheckNotFound {
            provider,
            health_check_id: context.health_check_id.unwrap_or_default(),
            raw_message: Some(raw.message),
        },

        // ============ 变更被拒 ============
        Some("InvalidChangeBatch") => ProviderError::InvalidChangeBatch {
            provider,
            messages: vec![raw.message],
        },

        // ============ 参数错误 ============
        Some("InvalidInput" | "InvalidArgument" | "InvalidDomainName" | "InvalidPaginationToken") => {
            ProviderError::InvalidParameter {
                provider,
                param: raw.code.unwrap_or_default(),
                detail: raw.message,
            }
        }

        // ============ 服务端错误 ============
        Some("InternalFailure" | "InternalError" | "ServiceUnavailable") => {
            ProviderError::NetworkError {
                provider,
                detail: raw.message,
            }
        }

        _ => return Err(raw),
    };
    Ok(mapped)
}
