//! DNS gateway implementations

/// Shared utilities used by gateway implementations.
pub mod common;

mod route53;
mod sts;

pub use route53::{Route53Gateway, Route53GatewayBuilder};
pub use sts::StsIdentityVerifier;
