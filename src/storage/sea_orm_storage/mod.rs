//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod lecture_materials;
mod lectures;
mod roles;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{Result, ScoalaError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 按给定数据库配置连接并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ScoalaError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // 内存数据库每个连接都是独立的库，只能使用单连接且不能回收
        if Self::is_memory_url(url) {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(opt)
                .await
                .map_err(|e| {
                    ScoalaError::database_connection(format!("SQLite 连接失败: {e}"))
                })?;
            return Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool));
        }

        let opt = opt
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ScoalaError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| ScoalaError::database_connection(format!("无法连接到数据库: {e}")))
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ScoalaError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    lecture_materials::{entities::LectureMaterial, requests::NewLectureMaterial},
    lectures::{entities::Lecture, requests::NewLecture},
    roles::entities::Role,
    users::{
        entities::User,
        requests::{NewUser, UserChanges},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        self.username_exists_impl(username).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_users_impl().await
    }

    async fn list_users_by_role(&self, role_id: &str) -> Result<Vec<User>> {
        self.list_users_by_role_impl(role_id).await
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<Option<User>> {
        self.update_user_impl(id, changes).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn add_role_to_user(&self, user_id: &str, role_id: &str) -> Result<bool> {
        self.add_role_to_user_impl(user_id, role_id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 角色模块
    async fn create_role(&self, name: &str) -> Result<Role> {
        self.create_role_impl(name).await
    }

    async fn get_role_by_id(&self, id: &str) -> Result<Option<Role>> {
        self.get_role_by_id_impl(id).await
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.get_role_by_name_impl(name).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn update_role(&self, id: &str, name: &str) -> Result<Option<Role>> {
        self.update_role_impl(id, name).await
    }

    async fn delete_role(&self, id: &str) -> Result<bool> {
        self.delete_role_impl(id).await
    }

    // 课程模块
    async fn create_lecture(&self, lecture: NewLecture) -> Result<Lecture> {
        self.create_lecture_impl(lecture).await
    }

    async fn get_lecture_by_id(&self, id: &str) -> Result<Option<Lecture>> {
        self.get_lecture_by_id_impl(id).await
    }

    async fn list_lectures(&self) -> Result<Vec<Lecture>> {
        self.list_lectures_impl().await
    }

    async fn update_lecture(&self, id: &str, lecture: NewLecture) -> Result<Option<Lecture>> {
        self.update_lecture_impl(id, lecture).await
    }

    async fn delete_lecture(&self, id: &str) -> Result<bool> {
        self.delete_lecture_impl(id).await
    }

    // 课程资料模块
    async fn create_lecture_material(
        &self,
        material: NewLectureMaterial,
    ) -> Result<LectureMaterial> {
        self.create_lecture_material_impl(material).await
    }

    async fn get_lecture_material_by_id(&self, id: &str) -> Result<Option<LectureMaterial>> {
        self.get_lecture_material_by_id_impl(id).await
    }

    async fn list_lecture_materials(&self) -> Result<Vec<LectureMaterial>> {
        self.list_lecture_materials_impl().await
    }

    async fn list_lecture_materials_by_lecture(
        &self,
        lecture_id: &str,
    ) -> Result<Vec<LectureMaterial>> {
        self.list_lecture_materials_by_lecture_impl(lecture_id)
            .await
    }

    async fn update_lecture_material(
        &self,
        id: &str,
        material: NewLectureMaterial,
    ) -> Result<Option<LectureMaterial>> {
        self.update_lecture_material_impl(id, material).await
    }

    async fn delete_lecture_material(&self, id: &str) -> Result<bool> {
        self.delete_lecture_material_impl(id).await
    }
}
