pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{ObjectCache, user_cache_key};
use crate::errors::{Result, ScoalaError};
use crate::models::roles::entities::Role;
use crate::models::users::{
    entities::User,
    requests::{AddRoleRequest, UserRequest},
};
use crate::models::auth::RegisterRequest;
use crate::storage::Storage;
use crate::utils::validate::non_blank;

pub struct UserService {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>) -> Self {
        Self { storage, cache }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    // 用户信息变更后，清除认证中间件缓存的用户
    pub(crate) async fn evict_cached_user(&self, user_id: &str) {
        self.cache.remove(&user_cache_key(user_id)).await;
    }

    // 获取全部用户
    pub async fn get_all(&self) -> Result<Vec<User>> {
        list::get_all(self).await
    }

    // 获取拥有指定角色的用户
    pub async fn get_all_by_role(&self, role_name: &str) -> Result<Vec<User>> {
        list::get_all_by_role(self, role_name).await
    }

    pub async fn get_one_by_id(&self, id: &str) -> Result<User> {
        get::get_one_by_id(self, id).await
    }

    pub async fn get_one_by_username(&self, username: &str) -> Result<User> {
        get::get_one_by_username(self, username).await
    }

    // 管理员创建用户
    pub async fn add(&self, entry: UserRequest) -> Result<User> {
        create::add(self, entry).await
    }

    // 自助注册，赋予默认角色
    pub async fn register(&self, form: RegisterRequest) -> Result<User> {
        create::register(self, form).await
    }

    // 更新用户，用户名不可修改
    pub async fn update(&self, id: &str, entry: UserRequest) -> Result<User> {
        update::update(self, id, entry).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        delete::delete(self, id).await
    }

    // 为用户追加角色
    pub async fn add_role_to_user(&self, user_id: &str, request: AddRoleRequest) -> Result<User> {
        update::add_role_to_user(self, user_id, request).await
    }

    /// 将角色名称解析为角色，名称为空、重复或不存在时返回 UserInvalidRoles
    pub(crate) async fn resolve_roles(
        &self,
        operation: &str,
        names: Option<&[String]>,
    ) -> Result<Vec<Role>> {
        let names = names.unwrap_or_default();
        if names.is_empty() {
            return Err(ScoalaError::user_invalid_roles(format!(
                "Method {operation}: Roles field can't be empty."
            )));
        }

        let mut seen = HashSet::new();
        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            let name = non_blank(Some(name.as_str())).ok_or_else(|| {
                ScoalaError::user_invalid_roles(format!(
                    "Method {operation}: Role names can't be empty."
                ))
            })?;
            if !seen.insert(name.to_string()) {
                continue;
            }
            let role = self.storage.get_role_by_name(name).await?.ok_or_else(|| {
                ScoalaError::user_invalid_roles(format!(
                    "Method {operation}: Role {name} doesn't exist."
                ))
            })?;
            roles.push(role);
        }
        Ok(roles)
    }
}
