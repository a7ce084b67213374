//! 测试辅助：内存 SQLite 存储与预置角色的服务集合

use std::sync::Arc;

use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::{CacheConfig, DatabaseConfig};
use crate::runtime::lifetime::startup::seed_roles;
use crate::services::{AuthService, LectureMaterialService, LectureService, RoleService, UserService};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

pub async fn memory_storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    Arc::new(
        SeaOrmStorage::connect(&config)
            .await
            .expect("failed to open in-memory storage"),
    )
}

pub fn memory_cache() -> Arc<dyn ObjectCache> {
    Arc::new(MokaCacheWrapper::new(&CacheConfig {
        default_ttl: 60,
        max_capacity: 1_000,
    }))
}

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub users: UserService,
    pub roles: RoleService,
    pub lectures: LectureService,
    pub materials: LectureMaterialService,
    pub auth: AuthService,
}

/// 已迁移并预置内置角色、但没有任何用户的上下文
pub async fn test_context() -> TestContext {
    let storage = memory_storage().await;
    seed_roles(&storage).await.expect("failed to seed roles");
    let cache = memory_cache();

    TestContext {
        users: UserService::new(storage.clone(), cache.clone()),
        roles: RoleService::new(storage.clone(), cache.clone()),
        lectures: LectureService::new(storage.clone()),
        materials: LectureMaterialService::new(storage.clone()),
        auth: AuthService::new(storage.clone()),
        storage,
        cache,
    }
}
