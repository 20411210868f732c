//! 对象缓存
//!
//! 目前用于保存服务端会话，键为会话令牌，值为 JSON 序列化后的身份信息。

pub mod object_cache;

use async_trait::async_trait;

pub use object_cache::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String);
    async fn remove(&self, key: &str);
}
