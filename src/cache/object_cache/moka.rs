use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::SessionConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Self { inner }
    }

    /// 按会话配置创建
    pub fn for_sessions(config: &SessionConfig) -> Self {
        Self::new(config.max_sessions, config.ttl_secs)
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Cache hit for key prefix: {}", key_prefix(key));
            CacheResult::Found(value)
        } else {
            debug!("Cache miss for key prefix: {}", key_prefix(key));
            CacheResult::NotFound
        }
    }

    // Moka 在创建时设置全局 TTL，所有条目共享同一过期策略
    async fn insert_raw(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

// 日志中不输出完整的会话令牌
fn key_prefix(key: &str) -> &str {
    key.split(':').next().unwrap_or_default()
}
