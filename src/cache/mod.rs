//! 对象缓存
//!
//! 以字符串形式存取序列化后的对象，目前只有基于 moka 的进程内实现。

pub mod object_cache;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub use object_cache::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化缓存对象，数据损坏时顺带清除该键
pub async fn get_object<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Failed to deserialize cached value for {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

/// 序列化并写入缓存对象
pub async fn insert_object<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key, json, ttl).await,
        Err(e) => tracing::warn!("Failed to serialize value for cache key {}: {}", key, e),
    }
}

/// 已认证用户的缓存键
pub fn user_cache_key(user_id: &str) -> String {
    format!("user:{user_id}")
}
