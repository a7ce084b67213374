use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::errors::Result;
use crate::models::roles::entities::RoleName;
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 补齐内置角色
pub async fn seed_roles(storage: &Arc<dyn Storage>) -> Result<()> {
    for name in RoleName::builtin() {
        if storage.get_role_by_name(name).await?.is_none() {
            storage.create_role(name).await?;
            info!("Built-in role {} created", name);
        }
    }
    Ok(())
}

/// 初始化默认管理员账号
/// 数据库中没有任何用户时，创建拥有 ROLE_ADMIN 的 admin 账号
pub async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} user(s), skipping admin seed",
            count
        );
        return Ok(());
    }
    info!("No users found in database, creating default admin account...");

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let Some(admin_role) = storage.get_role_by_name(RoleName::ADMIN).await? else {
        warn!("Role {} is missing, skipping admin seed", RoleName::ADMIN);
        return Ok(());
    };

    let user = storage
        .create_user(NewUser {
            name: "Administrator".to_string(),
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(&password)?,
            role_ids: vec![admin_role.id],
        })
        .await?;

    info!(
        "Default admin account created successfully (ID: {}, username: {})",
        user.id, user.username
    );
    Ok(())
}

/// 准备服务器启动的上下文：存储、内置数据与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_roles(&storage).await?;
    seed_admin(&storage).await?;

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::default());
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_storage;

    #[test]
    fn test_random_password() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.len(), 16);
        assert_ne!(pwd, generate_random_password(16));
    }

    #[actix_web::test]
    async fn test_seeding_is_idempotent() {
        let storage = memory_storage().await;
        seed_roles(&storage).await.unwrap();
        seed_roles(&storage).await.unwrap();
        assert_eq!(
            storage.list_roles().await.unwrap().len(),
            RoleName::builtin().len()
        );

        seed_admin(&storage).await.unwrap();
        seed_admin(&storage).await.unwrap();
        assert_eq!(storage.count_users().await.unwrap(), 1);

        let admin = storage
            .get_user_by_username(ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.has_role(RoleName::ADMIN));
    }
}
