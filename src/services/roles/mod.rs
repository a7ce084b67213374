use std::sync::Arc;
use tracing::info;

use crate::cache::ObjectCache;
use crate::errors::{Result, ScoalaError};
use crate::models::roles::{
    entities::{Role, RoleName},
    requests::RoleRequest,
};
use crate::storage::Storage;
use crate::utils::validate::{non_blank, validate_role_name};

pub struct RoleService {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
}

impl RoleService {
    pub fn new(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>) -> Self {
        Self { storage, cache }
    }

    pub async fn get_all(&self) -> Result<Vec<Role>> {
        self.storage.list_roles().await
    }

    pub async fn get_one_by_id(&self, id: &str) -> Result<Role> {
        self.storage
            .get_role_by_id(id)
            .await?
            .ok_or_else(|| ScoalaError::role_not_found("Method getOneById: Role not found."))
    }

    pub async fn get_one_by_name(&self, name: &str) -> Result<Role> {
        self.storage
            .get_role_by_name(name)
            .await?
            .ok_or_else(|| ScoalaError::role_not_found("Method getOneByName: Role not found."))
    }

    pub async fn add(&self, request: RoleRequest) -> Result<Role> {
        let name = Self::validated_name("add", request.name.as_deref())?;
        if self.storage.get_role_by_name(name).await?.is_some() {
            return Err(ScoalaError::role_name_already_used(format!(
                "Method add: Role {name} already exists."
            )));
        }

        let role = self.storage.create_role(name).await?;
        info!("Role {} created", role.name);
        Ok(role)
    }

    pub async fn update(&self, id: &str, request: RoleRequest) -> Result<Role> {
        let existing = self.get_one_by_id(id).await?;
        Self::ensure_not_builtin("update", &existing)?;
        let name = Self::validated_name("update", request.name.as_deref())?;

        if let Some(other) = self.storage.get_role_by_name(name).await?
            && other.id != existing.id
        {
            return Err(ScoalaError::role_name_already_used(format!(
                "Method update: Role {name} already exists."
            )));
        }

        let role = self
            .storage
            .update_role(id, name)
            .await?
            .ok_or_else(|| ScoalaError::role_not_found("Method update: Role not found."))?;

        // 缓存中的用户携带角色名称，整体失效
        self.cache.invalidate_all().await;
        info!("Role {} renamed to {}", existing.name, role.name);
        Ok(role)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let existing = self
            .storage
            .get_role_by_id(id)
            .await?
            .ok_or_else(|| ScoalaError::role_not_found("Method delete: Role not found."))?;
        Self::ensure_not_builtin("delete", &existing)?;

        if !self.storage.delete_role(id).await? {
            return Err(ScoalaError::role_not_found("Method delete: Role not found."));
        }

        self.cache.invalidate_all().await;
        info!("Role {} deleted", id);
        Ok(())
    }

    // 内置角色承载访问控制与默认注册角色，不可改名或删除
    fn ensure_not_builtin(operation: &str, role: &Role) -> Result<()> {
        if RoleName::builtin().contains(&role.name.as_str()) {
            return Err(ScoalaError::role_protected(format!(
                "Method {operation}: Role {} is built in and can't be changed.",
                role.name
            )));
        }
        Ok(())
    }

    fn validated_name<'a>(operation: &str, name: Option<&'a str>) -> Result<&'a str> {
        let name = non_blank(name).ok_or_else(|| {
            ScoalaError::role_invalid_name(format!("Method {operation}: Name field can't be empty."))
        })?;
        validate_role_name(name)
            .map_err(|msg| ScoalaError::role_invalid_name(format!("Method {operation}: {msg}.")))?;
        Ok(name)
    }
}
