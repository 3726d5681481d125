//! Route 53 HTTP 请求方法

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::{AMZ_DATE_FORMAT, sign_v4};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::AwsCredentials;

use super::types::{ErrorResponse, InvalidChangeBatchResponse};
use super::{ROUTE53_HOST, ROUTE53_SCOPE, Route53Gateway};

impl Route53Gateway {
    // ==================== 辅助方法 ====================

    /// 统一处理 Route 53 响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        // 通用错误结构
        if let Ok(error) = quick_xml::de::from_str::<ErrorResponse>(response_text) {
            log::debug!(
                "[{}] {} error {} (request {})",
                self.provider_name(),
                error.error.error_type.as_deref().unwrap_or("Unknown"),
                error.error.code,
                error.request_id.as_deref().unwrap_or("-")
            );
            return Err(self.map_error(
                RawApiError::with_code(error.error.code, error.error.message.unwrap_or_default()),
                ctx,
            ));
        }

        // 变更批次被拒绝时返回独立的根元素
        if let Ok(rejected) = quick_xml::de::from_str::<InvalidChangeBatchResponse>(response_text)
        {
            return Err(ProviderError::InvalidChangeBatch {
                provider: self.provider_name().to_string(),
                messages: rejected.messages.items,
            });
        }

        // 回退到通用错误
        Err(self.unknown_error(RawApiError::new(format!("HTTP {status}: {response_text}"))))
    }

    /// 签名并发送请求，返回响应正文
    async fn send_signed(
        &self,
        credentials: &AwsCredentials,
        method: &str,
        path: &str,
        query: &str,
        payload: String,
        ctx: ErrorContext,
    ) -> Result<String> {
        let amz_date = Utc::now().format(AMZ_DATE_FORMAT).to_string();

        let mut headers = vec![
            ("Host".to_string(), ROUTE53_HOST.to_string()),
            ("X-Amz-Date".to_string(), amz_date.clone()),
        ];
        if !payload.is_empty() {
            headers.push(("Content-Type".to_string(), "text/xml".to_string()));
        }

        let authorization = sign_v4(
            credentials,
            ROUTE53_SCOPE,
            method,
            path,
            query,
            &headers,
            &payload,
            &amz_date,
        );

        let url = if query.is_empty() {
            format!("https://{ROUTE53_HOST}{path}")
        } else {
            format!("https://{ROUTE53_HOST}{path}?{query}")
        };

        let request_builder = match method {
            "POST" => self.client.post(&url),
            _ => self.client.get(&url),
        };

        let mut request = request_builder.header("Authorization", authorization);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !payload.is_empty() {
            request = request.body(payload);
        }

        let action = format!("{method} {path}");
        let response =
            HttpUtils::send_with_retry(request, self.provider_name(), &action, self.max_retries)
                .await?;

        if !response.is_success() {
            log::warn!(
                "[{}] {action} returned HTTP {} (request {})",
                self.provider_name(),
                response.status,
                response.request_id.as_deref().unwrap_or("-")
            );
        }
        self.handle_response_error(response.status, &response.body, ctx)?;
        Ok(response.body)
    }

    // ==================== 公开 API 方法 ====================

    /// 执行 GET 请求
    pub(crate) async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        credentials: &AwsCredentials,
        path: &str,
        query: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let response_text = self
            .send_signed(credentials, "GET", path, query, String::new(), ctx)
            .await?;
        HttpUtils::parse_xml(&response_text, self.provider_name())
    }

    /// 执行 POST 请求（XML 正文）
    pub(crate) async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        credentials: &AwsCredentials,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let xml = quick_xml::se::to_string(body).map_err(|e| ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })?;
        let payload = format!(r#"<?xml version="1.0" encoding="UTF-8"?>{xml}"#);

        log::debug!("[{}] Request Body: {payload}", self.provider_name());

        let response_text = self
            .send_signed(credentials, "POST", path, "", payload, ctx)
            .await?;
        HttpUtils::parse_xml(&response_text, self.provider_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> Route53Gateway {
        Route53Gateway::new().unwrap()
    }

    #[test]
    fn success_status_passes() {
        assert!(
            gateway()
                .handle_response_error(200, "<Ok/>", ErrorContext::default())
                .is_ok()
        );
    }

    #[test]
    fn error_response_is_mapped() {
        let body = "<ErrorResponse><Error><Type>Sender</Type><Code>AccessDenied</Code><Message>not allowed</Message></Error><RequestId>r</RequestId></ErrorResponse>";
        let err = gateway()
            .handle_response_error(403, body, ErrorContext::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }

    #[test]
    fn invalid_change_batch_collects_messages() {
        let body = "<InvalidChangeBatch><Messages><Message>Tried to create resource record set but it already exists</Message></Messages></InvalidChangeBatch>";
        let err = gateway()
            .handle_response_error(400, body, ErrorContext::zone("Z1"))
            .unwrap_err();
        match err {
            ProviderError::InvalidChangeBatch { messages, .. } => assert_eq!(messages.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparseable_error_falls_back_to_unknown() {
        let err = gateway()
            .handle_response_error(500, "oops", ErrorContext::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unknown { .. }));
    }
}
