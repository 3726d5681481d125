//! Amazon Route 53 Gateway

pub(crate) mod error;
mod http;
mod provider;
/// Route 53 REST/XML request and response types.
pub(crate) mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::{SigningScope, create_http_client};

/// Route 53 API host (global endpoint).
pub(crate) const ROUTE53_HOST: &str = "route53.amazonaws.com";
/// Route 53 API version prefix of every path.
pub(crate) const ROUTE53_API_VERSION: &str = "2013-04-01";
/// XML namespace of request bodies.
pub(crate) const ROUTE53_XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";
/// Route 53 is signed against us-east-1 regardless of where zones are served.
pub(crate) const ROUTE53_SCOPE: SigningScope = SigningScope {
    region: "us-east-1",
    service: "route53",
};

/// Amazon Route 53 gateway implementation.
///
/// One instance serves every account: credentials are passed per call and each request is
/// signed with AWS Signature Version 4.
///
/// # Construction
///
/// ```rust,no_run
/// use std::time::Duration;
/// use dns_failover_provider::Route53Gateway;
///
/// # fn main() -> dns_failover_provider::Result<()> {
/// let gateway = Route53Gateway::builder()
///     .request_timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Route53Gateway {
    pub(crate) client: Client,
    pub(crate) max_retries: u32,
}

/// Builder for [`Route53Gateway`] with configurable retry and timeout behavior.
#[derive(Debug, Default)]
pub struct Route53GatewayBuilder {
    max_retries: u32,
    request_timeout: Option<Duration>,
}

impl Route53GatewayBuilder {
    /// Set the maximum number of automatic retries for transient errors (default: 0).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set a per-request timeout (default: none).
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the [`Route53Gateway`] instance.
    pub fn build(self) -> Result<Route53Gateway> {
        Ok(Route53Gateway {
            client: create_http_client(self.request_timeout, "route53")?,
            max_retries: self.max_retries,
        })
    }
}

impl Route53Gateway {
    /// Creates a gateway with default settings (no retries, no request timeout).
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Returns a builder for customizing the gateway configuration.
    pub fn builder() -> Route53GatewayBuilder {
        Route53GatewayBuilder::default()
    }

    /// `/2013-04-01/{resource}`
    pub(crate) fn api_path(resource: &str) -> String {
        format!("/{ROUTE53_API_VERSION}/{resource}")
    }
}
