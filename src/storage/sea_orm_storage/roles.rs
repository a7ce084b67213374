use super::SeaOrmStorage;
use crate::entity::prelude::UsersRoles;
use crate::entity::roles::{ActiveModel, Column, Entity as Roles};
use crate::entity::users_roles::Column as UserRoleColumn;
use crate::errors::{Result, ScoalaError};
use crate::models::roles::entities::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建角色
    pub async fn create_role_impl(&self, name: &str) -> Result<Role> {
        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("创建角色失败: {e}")))?;

        Ok(result.into_role())
    }

    /// 通过 ID 获取角色
    pub async fn get_role_by_id_impl(&self, id: &str) -> Result<Option<Role>> {
        let result = Roles::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(result.map(|m| m.into_role()))
    }

    /// 通过名称获取角色
    pub async fn get_role_by_name_impl(&self, name: &str) -> Result<Option<Role>> {
        let result = Roles::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(result.map(|m| m.into_role()))
    }

    /// 列出全部角色
    pub async fn list_roles_impl(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询角色列表失败: {e}")))?;

        Ok(roles.into_iter().map(|m| m.into_role()).collect())
    }

    /// 重命名角色
    pub async fn update_role_impl(&self, id: &str, name: &str) -> Result<Option<Role>> {
        if self.get_role_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("更新角色失败: {e}")))?;

        Ok(Some(result.into_role()))
    }

    /// 删除角色及其用户关联
    pub async fn delete_role_impl(&self, id: &str) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("开启事务失败: {e}")))?;

        UsersRoles::delete_many()
            .filter(UserRoleColumn::RoleId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("清除角色关联失败: {e}")))?;

        let result = Roles::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("删除角色失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
