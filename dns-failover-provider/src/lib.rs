//! # dns-failover-provider
//!
//! Account-scoped gateway to the Amazon Route 53 API, used by the failover control plane.
//!
//! A single [`Route53Gateway`] serves every account: credentials travel with each call, and
//! each request is signed with AWS Signature Version 4. [`StsIdentityVerifier`] resolves
//! which account a key pair belongs to.
//!
//! ## Operations
//!
//! | Operation | Route 53 API | Page ceiling |
//! |-----------|--------------|--------------|
//! | [`DnsGateway::list_hosted_zones`] | `ListHostedZones` | 500 |
//! | [`DnsGateway::list_resource_record_sets`] | `ListResourceRecordSets` | 1000 |
//! | [`DnsGateway::list_health_checks`] | `ListHealthChecks` | 1000 |
//! | [`DnsGateway::get_health_check_status`] | `GetHealthCheckStatus` | - |
//! | [`DnsGateway::change_resource_record_sets`] | `ChangeResourceRecordSets` | - |
//!
//! Pagination is not supported. A listing the API reports as truncated fails with
//! [`ProviderError::Truncated`] rather than returning a partial page.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_failover_provider::{AwsCredentials, DnsGateway, IdentityVerifier, Route53Gateway,
//!     StsIdentityVerifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = AwsCredentials::new("AKIA...", "secret");
//!
//!     // 1. Resolve the owning account
//!     let account_id = StsIdentityVerifier::new()?.verify_identity(&credentials).await?;
//!     println!("account {account_id}");
//!
//!     // 2. List zones and their records
//!     let gateway = Route53Gateway::new()?;
//!     for zone in gateway.list_hosted_zones(&credentials).await? {
//!         let records = gateway.list_resource_record_sets(&credentials, &zone.id).await?;
//!         println!("{} ({} records)", zone.name, records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: authentication failed
//! - [`ProviderError::HostedZoneNotFound`]: zone does not exist in the account
//! - [`ProviderError::Truncated`]: listing exceeded the page ceiling
//! - [`ProviderError::RateLimited`] / [`ProviderError::NetworkError`]: transient
//!
//! Transient errors are retried only when a retry budget is configured with
//! [`Route53GatewayBuilder::max_retries`].

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export public traits only (internal traits are not exported)
pub use traits::{DnsGateway, IdentityVerifier};

// Re-export types
pub use types::{
    AliasTarget, AwsCredentials, Change, ChangeAction, ChangeBatch, ChangeInfo, ChangeStatus,
    HealthCheck, HealthCheckConfig, HealthCheckObservation, HostedZone, HostedZoneConfig,
    MAX_HEALTH_CHECKS, MAX_HOSTED_ZONES, MAX_RECORD_SETS, RecordType, ResourceRecord,
    ResourceRecordSet, StatusReport, strip_resource_prefix,
};

// Re-export concrete implementations
pub use providers::{Route53Gateway, Route53GatewayBuilder, StsIdentityVerifier};
