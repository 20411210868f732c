//! 服务端会话
//!
//! 会话令牌为随机 UUID，缓存中保存 JSON 序列化的身份信息，过期时间由缓存 TTL 决定。

use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;
use crate::models::auth::Identity;

#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<dyn ObjectCache>,
    ttl_secs: u64,
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

impl SessionStore {
    pub fn new(cache: Arc<dyn ObjectCache>, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// 创建会话并返回令牌
    pub async fn create(&self, identity: &Identity) -> Result<String> {
        let token = uuid::Uuid::new_v4().to_string();
        let payload = serde_json::to_string(identity)?;
        self.cache.insert_raw(session_key(&token), payload).await;
        debug!("Session created for account {}", identity.account_id);
        Ok(token)
    }

    /// 读取会话，不存在、已过期或无法解析时返回 None
    pub async fn get(&self, token: &str) -> Option<Identity> {
        match self.cache.get_raw(&session_key(token)).await {
            CacheResult::Found(json) => match serde_json::from_str::<Identity>(&json) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    debug!("Dropping unreadable session: {}", e);
                    self.cache.remove(&session_key(token)).await;
                    None
                }
            },
            CacheResult::NotFound => None,
        }
    }

    /// 销毁会话
    pub async fn destroy(&self, token: &str) {
        self.cache.remove(&session_key(token)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::models::accounts::entities::Role;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MokaCacheWrapper::new(100, 60)), 60)
    }

    #[tokio::test]
    async fn test_create_get_destroy() {
        let sessions = store();
        let identity = Identity::new(3, Role::Student, "Budi Student");

        let token = sessions.create(&identity).await.unwrap();
        assert_eq!(sessions.get(&token).await, Some(identity));

        sessions.destroy(&token).await;
        assert_eq!(sessions.get(&token).await, None);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let sessions = store();
        let identity = Identity::new(1, Role::Admin, "Administrator");
        let first = sessions.create(&identity).await.unwrap();
        let second = sessions.create(&identity).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_or_corrupt_token() {
        let cache = Arc::new(MokaCacheWrapper::new(100, 60));
        cache
            .insert_raw(session_key("broken"), "not json".to_string())
            .await;
        let sessions = SessionStore::new(cache.clone(), 60);

        assert_eq!(sessions.get("missing").await, None);
        assert_eq!(sessions.get("broken").await, None);
        assert_eq!(
            cache.get_raw(&session_key("broken")).await,
            CacheResult::NotFound
        );
    }
}
