//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use dns_failover_provider::ProviderError;

use crate::types::RejectReason;

/// Coarse error classification, used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Account, site, hosted zone or health check does not exist
    NotFound,
    /// Account exists but its secret key is missing (server-side data problem)
    MissingCredential,
    /// A listing exceeded the page-size ceiling
    Truncated,
    /// Network, timeout or throttling at the provider
    UpstreamUnavailable,
    /// Failover refused before anything was submitted
    Rejected,
    /// Uniqueness or identity mismatch
    Conflict,
    /// Invalid input or credentials
    Invalid,
    /// Anything else
    Internal,
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Site not found
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// Hosted zone not found in any account
    #[error("Hosted zone not found: {0}")]
    HostedZoneNotFound(String),

    /// Account has no stored secret key
    #[error("Account {0} is missing credentials")]
    MissingCredential(String),

    /// Failover rejected before submission
    #[error("Failover rejected: {0}")]
    Rejected(RejectReason),

    /// Name, fqdn or account identity already taken / mismatched
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Classify the error.
    ///
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) | Self::SiteNotFound(_) | Self::HostedZoneNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::MissingCredential(_) => ErrorKind::MissingCredential,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::ValidationError(_) => ErrorKind::Invalid,
            Self::StorageError(_) => ErrorKind::Internal,
            Self::Provider(e) => match e {
                ProviderError::Truncated { .. } => ErrorKind::Truncated,
                ProviderError::NetworkError { .. }
                | ProviderError::Timeout { .. }
                | ProviderError::RateLimited { .. } => ErrorKind::UpstreamUnavailable,
                ProviderError::HostedZoneNotFound { .. }
                | ProviderError::HealthCheckNotFound { .. } => ErrorKind::NotFound,
                ProviderError::InvalidCredentials { .. }
                | ProviderError::PermissionDenied { .. }
                | ProviderError::InvalidChangeBatch { .. }
                | ProviderError::InvalidParameter { .. } => ErrorKind::Invalid,
                ProviderError::ParseError { .. }
                | ProviderError::SerializationError { .. }
                | ProviderError::Unknown { .. } => ErrorKind::Internal,
            },
        }
    }

    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_expected(),
            _ => matches!(
                self.kind(),
                ErrorKind::NotFound | ErrorKind::Rejected | ErrorKind::Conflict | ErrorKind::Invalid
            ),
        }
    }

    /// Whether the error is a page-size truncation reported by the provider.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.kind() == ErrorKind::Truncated
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
