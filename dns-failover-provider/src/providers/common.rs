//! Provider 公共工具函数

use std::fmt::Write;
use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::error::{ProviderError, Result};
use crate::types::AwsCredentials;
use crate::utils::log_sanitizer::truncate_for_log;

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// 创建 HTTP Client
///
/// 请求超时仅在调用方显式配置时设置；连接超时始终生效。
pub fn create_http_client(request_timeout: Option<Duration>, provider: &str) -> Result<Client> {
    let mut builder =
        Client::builder().connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
    if let Some(timeout) = request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| ProviderError::NetworkError {
        provider: provider.to_string(),
        detail: format!("Failed to create HTTP client: {e}"),
    })
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 计算
#[allow(clippy::expect_used)]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// SHA-256 hex digest
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// ============ AWS Signature V4 ============

/// AWS 时间戳格式（`x-amz-date`）
pub const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// SigV4 credential scope (region + service)
#[derive(Debug, Clone, Copy)]
pub struct SigningScope {
    pub region: &'static str,
    pub service: &'static str,
}

/// Generate an AWS Signature Version 4 `Authorization` header
/// Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>
///
/// `query` must already be URI-encoded; `headers` must contain every header that is sent
/// and signed, including `host` and `x-amz-date`.
#[allow(clippy::too_many_arguments)]
pub fn sign_v4(
    credentials: &AwsCredentials,
    scope: SigningScope,
    method: &str,
    uri: &str,
    query: &str,
    headers: &[(String, String)],
    payload: &str,
    amz_date: &str,
) -> String {
    // 1. Query String sorting
    let canonical_query = if query.is_empty() {
        String::new()
    } else {
        let mut params: Vec<&str> = query.split('&').collect();
        params.sort_unstable();
        params.join("&")
    };

    // 2. Canonical headers
    let mut sorted_headers: Vec<_> = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.trim()))
        .collect();
    sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical_headers: String =
        sorted_headers
            .iter()
            .fold(String::new(), |mut acc, (k, v)| {
                let _ = writeln!(acc, "{k}:{v}");
                acc
            });

    let signed_headers: String = sorted_headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    // 3. Canonical request
    let hashed_payload = sha256_hex(payload.as_bytes());
    let canonical_request = format!(
        "{method}\n{uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
    );

    log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

    // 4. String to sign
    let date_stamp = amz_date.get(..8).unwrap_or(amz_date);
    let credential_scope = format!(
        "{date_stamp}/{}/{}/aws4_request",
        scope.region, scope.service
    );
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    log::debug!("StringToSign:\n{string_to_sign}");

    // 5. Signing key: date -> region -> service -> "aws4_request"
    let k_secret = format!("AWS4{}", credentials.secret_access_key);
    let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, scope.region.as_bytes());
    let k_service = hmac_sha256(&k_region, scope.service.as_bytes());
    let k_signing = hmac_sha256(&k_service, b"aws4_request");

    let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

    format!(
        "AWS4-HMAC-SHA256 Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
        credentials.access_key_id
    )
}
