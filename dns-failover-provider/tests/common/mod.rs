//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use dns_failover_provider::{
    AwsCredentials, DnsGateway, HostedZone, Route53Gateway, StsIdentityVerifier,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 解包 `Option`，为 `None` 时带消息失败
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 解包 `Result`，为 `Err` 时带消息和错误失败
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(res.is_ok(), "{}: {res:?}", format_args!($($msg)+));
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 测试上下文 - 封装 Gateway、凭证和可选测试域名
pub struct TestContext {
    pub gateway: Route53Gateway,
    pub verifier: StsIdentityVerifier,
    pub credentials: AwsCredentials,
    /// `TEST_DOMAIN`（可选），带不带末尾的点均可
    pub domain: Option<String>,
}

impl TestContext {
    /// 从环境变量创建测试上下文
    pub fn from_env() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;

        Some(Self {
            gateway: Route53Gateway::new().ok()?,
            verifier: StsIdentityVerifier::new().ok()?,
            credentials: AwsCredentials::new(access_key_id, secret_access_key),
            domain: env::var("TEST_DOMAIN").ok(),
        })
    }

    /// 查找测试域名对应的托管区域
    pub async fn find_test_zone(&self) -> Option<HostedZone> {
        let domain = self.domain.as_deref()?.trim_end_matches('.');
        let zones = self.gateway.list_hosted_zones(&self.credentials).await.ok()?;
        zones
            .into_iter()
            .find(|z| z.name.trim_end_matches('.') == domain)
    }
}
