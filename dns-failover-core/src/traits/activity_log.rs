//! 活动日志抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::ActivityEntry;

/// 活动日志 Trait
///
/// 写入失败由调用方记录日志，不会改变业务操作的结果。
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// 追加一条日志
    async fn record(&self, entry: &ActivityEntry) -> CoreResult<()>;
}
