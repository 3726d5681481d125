//! 已签名 AWS 请求的发送与重试
//!
//! Route 53 和 STS 各自构建并签名 `RequestBuilder`，这里负责发送、记录请求 ID
//! 以及把传输层失败归类为 [`ProviderError`]。

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// AWS 在每个响应中返回的请求 ID 头
const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// 退避基数
const BACKOFF_BASE: Duration = Duration::from_millis(100);
/// 退避上限（与 AWS SDK 标准重试模式一致）
const BACKOFF_CAP: Duration = Duration::from_secs(20);
/// `Retry-After` 上限
const RETRY_AFTER_CAP: Duration = Duration::from_secs(30);

/// 未经解析的 AWS 响应
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub request_id: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// 发送一次请求
    ///
    /// 429 视为限流，5xx 视为上游暂时不可用；其余状态码原样返回给调用方解析。
    pub async fn send(
        request: RequestBuilder,
        provider: &str,
        action: &str,
    ) -> Result<RawResponse> {
        log::debug!("[{provider}] -> {action}");

        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(&e, provider))?;

        let status = response.status().as_u16();
        let request_id = header_str(&response, REQUEST_ID_HEADER);
        let retry_after = header_str(&response, "retry-after").and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("failed to read {action} response body: {e}"),
            })?;

        log::debug!(
            "[{provider}] <- {action} HTTP {status} (request {}): {}",
            request_id.as_deref().unwrap_or("-"),
            truncate_for_log(&body)
        );

        match status {
            429 => {
                log::warn!("[{provider}] {action} throttled, retry_after={retry_after:?}");
                Err(ProviderError::RateLimited {
                    provider: provider.to_string(),
                    retry_after,
                    raw_message: Some(truncate_for_log(&body)),
                })
            }
            500..=599 => {
                log::warn!("[{provider}] {action} failed upstream with HTTP {status}");
                Err(ProviderError::NetworkError {
                    provider: provider.to_string(),
                    detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
                })
            }
            _ => Ok(RawResponse {
                status,
                request_id,
                body,
            }),
        }
    }

    /// 发送请求，暂时性失败最多重试 `max_retries` 次
    ///
    /// `max_retries == 0` 时只发送一次。只有 `NetworkError`、`Timeout`、`RateLimited`
    /// 会重试；限流时优先使用 `Retry-After`。
    pub async fn send_with_retry(
        request: RequestBuilder,
        provider: &str,
        action: &str,
        max_retries: u32,
    ) -> Result<RawResponse> {
        let mut attempt = 0;
        loop {
            // RequestBuilder 只能发送一次；无法克隆（流式正文）时不重试
            let (this_try, next) = match request.try_clone() {
                Some(clone) if attempt < max_retries => (clone, true),
                Some(clone) => (clone, false),
                None => return Self::send(request, provider, action).await,
            };

            match Self::send(this_try, provider, action).await {
                Err(e) if next && e.is_transient() => {
                    let delay = retry_delay(&e, attempt);
                    attempt += 1;
                    log::warn!(
                        "[{provider}] {action} attempt {attempt}/{} failed, retrying in {}ms: {e}",
                        max_retries + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// 解析 XML 响应正文
    ///
    /// 根元素名称不参与匹配，只按 `T` 的字段解析子元素。
    pub fn parse_xml<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T> {
        quick_xml::de::from_str(body).map_err(|e| {
            log::error!(
                "[{provider}] Unparseable response ({e}): {}",
                truncate_for_log(body)
            );
            ProviderError::ParseError {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

fn header_str(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn classify_send_error(e: &reqwest::Error, provider: &str) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    }
}

/// 下一次重试前的等待时间
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    match error {
        ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs(*secs).min(RETRY_AFTER_CAP),
        _ => backoff_delay(attempt),
    }
}

/// 指数退避：100ms, 200ms, 400ms, ... 上限 20 秒
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE
        .saturating_mul(2_u32.saturating_pow(attempt))
        .min(BACKOFF_CAP)
}
