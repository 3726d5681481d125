//! AWS STS identity verification
//!
//! `GetCallerIdentity` needs no IAM permission, so it doubles as a credential check: any
//! valid key pair resolves to the account that owns it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::{AMZ_DATE_FORMAT, SigningScope, create_http_client, sign_v4};
use crate::providers::route53::types::ErrorResponse;
use crate::providers::route53::error::map_aws_error;
use crate::traits::{ErrorContext, IdentityVerifier, ProviderErrorMapper, RawApiError};
use crate::types::AwsCredentials;

/// STS global endpoint host.
const STS_HOST: &str = "sts.amazonaws.com";
const STS_SCOPE: SigningScope = SigningScope {
    region: "us-east-1",
    service: "sts",
};
const GET_CALLER_IDENTITY_BODY: &str = "Action=GetCallerIdentity&Version=2011-06-15";

/// Response payload for `GetCallerIdentity`.
#[derive(Debug, Deserialize)]
struct GetCallerIdentityResponse {
    #[serde(rename = "GetCallerIdentityResult")]
    result: GetCallerIdentityResult,
}

#[derive(Debug, Deserialize)]
struct GetCallerIdentityResult {
    #[serde(rename = "Account")]
    account: String,
    #[serde(rename = "Arn")]
    arn: Option<String>,
}

/// [`IdentityVerifier`] backed by AWS STS `GetCallerIdentity`.
pub struct StsIdentityVerifier {
    client: Client,
    max_retries: u32,
}

impl StsIdentityVerifier {
    /// Creates a verifier with no retries and no request timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(0, None)
    }

    /// Creates a verifier with an explicit retry budget and optional request timeout.
    pub fn with_options(max_retries: u32, request_timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: create_http_client(request_timeout, "sts")?,
            max_retries,
        })
    }

    fn handle_response_error(&self, status: u16, response_text: &str) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if let Ok(error) = quick_xml::de::from_str::<ErrorResponse>(response_text) {
            return Err(self.map_error(
                RawApiError::with_code(error.error.code, error.error.message.unwrap_or_default()),
                ErrorContext::default(),
            ));
        }

        Err(self.unknown_error(RawApiError::new(format!("HTTP {status}: {response_text}"))))
    }
}

impl ProviderErrorMapper for StsIdentityVerifier {
    fn provider_name(&self) -> &'static str {
        "sts"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        map_aws_error(self.provider_name(), raw, context)
            .unwrap_or_else(|raw| self.unknown_error(raw))
    }
}

#[async_trait]
impl IdentityVerifier for StsIdentityVerifier {
    async fn verify_identity(&self, credentials: &AwsCredentials) -> Result<String> {
        let amz_date = Utc::now().format(AMZ_DATE_FORMAT).to_string();
        let content_type = "application/x-www-form-urlencoded; charset=utf-8";

        let headers = vec![
            ("Content-Type".to_string(), content_type.to_string()),
            ("Host".to_string(), STS_HOST.to_string()),
            ("X-Amz-Date".to_string(), amz_date.clone()),
        ];
        let authorization = sign_v4(
            credentials,
            STS_SCOPE,
            "POST",
            "/",
            "",
            &headers,
            GET_CALLER_IDENTITY_BODY,
            &amz_date,
        );

        let url = format!("https://{STS_HOST}/");
        let request = self
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .header("Host", STS_HOST)
            .header("X-Amz-Date", &amz_date)
            .header("Authorization", authorization)
            .body(GET_CALLER_IDENTITY_BODY);

        let response = HttpUtils::send_with_retry(
            request,
            self.provider_name(),
            "GetCallerIdentity",
            self.max_retries,
        )
        .await?;
        self.handle_response_error(response.status, &response.body)?;

        let response: GetCallerIdentityResponse =
            HttpUtils::parse_xml(&response.body, self.provider_name())?;

        log::debug!(
            "[{}] Caller identity: account={}, arn={}",
            self.provider_name(),
            response.result.account,
            response.result.arn.as_deref().unwrap_or("-")
        );

        if response.result.account.is_empty() {
            return Err(self.parse_error("GetCallerIdentity returned an empty account"));
        }
        Ok(response.result.account)
    }
}
