//! DNS Failover Core Library
//!
//! Control-plane logic for Route 53 weighted-record failover:
//! - Account and site management (`AccountService`, `SiteService`)
//! - Cached reads of zones, records and health checks (`DnsService`)
//! - Cross-account zone index (`ZoneIndexService`)
//! - Failover orchestration (`FailoverService`)
//!
//! Storage is abstracted through traits; the remote API is reached through the
//! [`DnsGateway`](dns_failover_provider::DnsGateway) of the provider crate.

pub mod cache;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use cache::{CacheConfig, DnsCache};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use services::ServiceContext;
pub use traits::{AccountRepository, ActivityLog, CredentialStore, SiteRepository};
