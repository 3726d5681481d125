//! 站点持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Site;

/// 站点仓库 Trait
#[async_trait]
pub trait SiteRepository: Send + Sync {
    async fn find_all(&self) -> CoreResult<Vec<Site>>;

    /// 根据 ID 获取站点
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>>;

    /// 保存站点（新建或更新）
    async fn save(&self, site: &Site) -> CoreResult<()>;

    async fn delete(&self, id: &str) -> CoreResult<()>;
}
