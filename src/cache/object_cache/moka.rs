use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::{AppConfig, CacheConfig};

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl Default for MokaCacheWrapper {
    fn default() -> Self {
        Self::new(&AppConfig::get().cache)
    }
}

impl MokaCacheWrapper {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            config.max_capacity, config.default_ttl
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // 使用构建时设置的全局 TTL，单项 TTL 被忽略
        self.inner.insert(key, value).await;
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL, using global TTL configuration");
        }
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_object, insert_object};

    fn test_cache() -> MokaCacheWrapper {
        MokaCacheWrapper::new(&CacheConfig {
            default_ttl: 60,
            max_capacity: 100,
        })
    }

    #[actix_web::test]
    async fn test_insert_get_remove() {
        let cache = test_cache();
        cache.insert_raw("k".to_string(), "v".to_string(), 0).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));

        cache.remove("k").await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }

    #[actix_web::test]
    async fn test_corrupt_object_is_evicted() {
        let cache = test_cache();
        cache
            .insert_raw("user:1".to_string(), "not json".to_string(), 0)
            .await;

        let value: Option<Vec<String>> = get_object(&cache, "user:1").await;
        assert!(value.is_none());
        assert_eq!(cache.get_raw("user:1").await, CacheResult::NotFound);

        insert_object(&cache, "user:1".to_string(), &vec!["a".to_string()], 0).await;
        let value: Option<Vec<String>> = get_object(&cache, "user:1").await;
        assert_eq!(value, Some(vec!["a".to_string()]));
    }
}
