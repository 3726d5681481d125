//! 带过期时间的缓存条目

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::CoreResult;

/// Cached value with its expiry instant
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// 单个命名空间的 TTL 缓存
///
/// 只在拉取成功后写入完整的值；拉取失败或 future 被丢弃时缓存保持不变。
pub struct TtlCache<V> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 获取未过期的值
    pub async fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: &str, value: V) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry::new(value, self.ttl));
    }

    /// 命中则返回缓存值，否则（或 `force` 时）调用 `fetch` 并写入结果
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, force: bool, fetch: F) -> CoreResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CoreResult<V>>,
    {
        if !force {
            if let Some(value) = self.get(key).await {
                log::debug!("[cache:{}] hit {key}", self.name);
                return Ok(value);
            }
        }

        log::debug!(
            "[cache:{}] {} {key}",
            self.name,
            if force { "refresh" } else { "miss" }
        );
        let value = fetch().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// 条目数（包括已过期但未清理的）
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
