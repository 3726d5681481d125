use serde::{Deserialize, Serialize};

/// Unified error type for all gateway operations.
///
/// Each variant carries `provider` (`route53` or `sts`); `raw_message` fields hold the
/// message AWS returned, when there was one. All variants are serializable for
/// structured error reporting.
///
/// # Transient Errors
///
/// The following variants represent transient upstream failures:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
///
/// The HTTP layer only retries them when a retry budget is configured (off by default).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        provider: String,
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        provider: String,
        detail: String,
    },

    /// The API rate limit has been exceeded (`Throttling`, HTTP 429 or equivalent).
    RateLimited {
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    /// The provided access key / secret key pair is invalid or expired.
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// The credentials are valid but lack permission for the requested operation.
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// The specified hosted zone does not exist in the account.
    HostedZoneNotFound {
        provider: String,
        /// Hosted zone ID that was not found.
        zone_id: String,
        raw_message: Option<String>,
    },

    /// The specified health check does not exist in the account.
    HealthCheckNotFound {
        provider: String,
        /// Health check ID that was not found.
        health_check_id: String,
        raw_message: Option<String>,
    },

    /// The provider rejected a change batch.
    InvalidChangeBatch {
        provider: String,
        /// Messages returned by the provider, one per rejected change.
        messages: Vec<String>,
    },

    /// A request parameter is invalid.
    InvalidParameter {
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A listing reported more items than the fixed page-size ceiling.
    ///
    /// Pagination is not supported; a partial page is never returned in its place.
    Truncated {
        provider: String,
        /// Human-readable description of what was being listed.
        resource: String,
        /// Page-size ceiling that was requested.
        limit: u32,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    Unknown {
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::HostedZoneNotFound { .. }
                | Self::HealthCheckNotFound { .. }
                | Self::InvalidChangeBatch { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether the failure is a transient upstream condition (network, timeout, throttling).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Writes `[provider] label`, followed by `: detail` when a detail is present.
fn labelled(
    f: &mut std::fmt::Formatter<'_>,
    provider: &str,
    label: &str,
    detail: Option<&str>,
) -> std::fmt::Result {
    match detail {
        Some(detail) => write!(f, "[{provider}] {label}: {detail}"),
        None => write!(f, "[{provider}] {label}"),
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                labelled(f, provider, "Network error", Some(detail))
            }
            Self::Timeout { provider, detail } => {
                labelled(f, provider, "Request timeout", Some(detail))
            }
            Self::RateLimited {
                provider,
                retry_after: Some(secs),
                ..
            } => write!(f, "[{provider}] Rate limited (retry after {secs}s)"),
            Self::RateLimited { provider, .. } => labelled(f, provider, "Rate limited", None),
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => labelled(f, provider, "Invalid credentials", raw_message.as_deref()),
            Self::PermissionDenied {
                provider,
                raw_message,
            } => labelled(f, provider, "Permission denied", raw_message.as_deref()),
            Self::HostedZoneNotFound {
                provider, zone_id, ..
            } => write!(f, "[{provider}] Hosted zone '{zone_id}' not found"),
            Self::HealthCheckNotFound {
                provider,
                health_check_id,
                ..
            } => write!(f, "[{provider}] Health check '{health_check_id}' not found"),
            Self::InvalidChangeBatch { provider, messages } => {
                let joined = messages.join("; ");
                let detail = (!joined.is_empty()).then_some(joined.as_str());
                labelled(f, provider, "Invalid change batch", detail)
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => write!(f, "[{provider}] Invalid parameter '{param}': {detail}"),
            Self::Truncated {
                provider,
                resource,
                limit,
            } => write!(
                f,
                "[{provider}] Too many {resource} (more than {limit}), pagination is not supported"
            ),
            Self::ParseError { provider, detail } => {
                labelled(f, provider, "Parse error", Some(detail))
            }
            Self::SerializationError { provider, detail } => {
                labelled(f, provider, "Serialization error", Some(detail))
            }
            Self::Unknown {
                provider,
                raw_code,
                raw_message,
            } => match raw_code {
                Some(code) => write!(f, "[{provider}] {code}: {raw_message}"),
                None => write!(f, "[{provider}] {raw_message}"),
            },
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
