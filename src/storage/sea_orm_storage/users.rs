use super::SeaOrmStorage;
use crate::entity::prelude::{Roles, UserRoleActiveModel, UsersRoles};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::users_roles::Column as UserRoleColumn;
use crate::errors::{Result, ScoalaError};
use crate::models::users::{
    entities::User,
    requests::{NewUser, UserChanges},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let id = uuid::Uuid::new_v4().to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("开启事务失败: {e}")))?;

        let username = req.username.clone();
        let model = ActiveModel {
            id: Set(id.clone()),
            name: Set(req.name),
            username: Set(req.username),
            password_hash: Set(req.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // 并发注册时由唯一索引兜底
        model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ScoalaError::user_username_already_used(
                format!("Method add: Username {username} is already used."),
            ),
            _ => ScoalaError::database_operation(format!("创建用户失败: {e}")),
        })?;

        Self::insert_user_roles(&txn, &id, &req.role_ids).await?;

        txn.commit()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_user_by_id_impl(&id)
            .await?
            .ok_or_else(|| ScoalaError::database_operation("创建用户后无法读取用户"))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: &str) -> Result<Option<User>> {
        let result = Users::find_by_id(id.to_string())
            .find_with_related(Roles)
            .all(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result
            .into_iter()
            .next()
            .map(|(user, roles)| user.into_user(roles)))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户失败: {e}")))?;

        match result {
            Some(user) => {
                let roles = user
                    .find_related(Roles)
                    .all(&self.db)
                    .await
                    .map_err(|e| ScoalaError::database_operation(format!("查询用户角色失败: {e}")))?;
                Ok(Some(user.into_user(roles)))
            }
            None => Ok(None),
        }
    }

    /// 用户名是否已存在
    pub async fn username_exists_impl(&self, username: &str) -> Result<bool> {
        let count = Users::find()
            .filter(Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(count > 0)
    }

    /// 列出全部用户，按创建时间排序
    pub async fn list_users_impl(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .find_with_related(Roles)
            .all(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|(user, roles)| user.into_user(roles))
            .collect())
    }

    /// 列出拥有指定角色的用户
    pub async fn list_users_by_role_impl(&self, role_id: &str) -> Result<Vec<User>> {
        let user_ids: Vec<String> = UsersRoles::find()
            .filter(UserRoleColumn::RoleId.eq(role_id))
            .all(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询角色成员失败: {e}")))?
            .into_iter()
            .map(|link| link.user_id)
            .collect();

        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = Users::find()
            .filter(Column::Id.is_in(user_ids))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .find_with_related(Roles)
            .all(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|(user, roles)| user.into_user(roles))
            .collect())
    }

    /// 更新用户信息，角色整体替换
    pub async fn update_user_impl(&self, id: &str, changes: UserChanges) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = Users::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            id: Set(id.to_string()),
            name: Set(changes.name),
            password_hash: Set(changes.password_hash),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("更新用户失败: {e}")))?;

        UsersRoles::delete_many()
            .filter(UserRoleColumn::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("清除用户角色失败: {e}")))?;

        Self::insert_user_roles(&txn, id, &changes.role_ids).await?;

        txn.commit()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: &str) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("开启事务失败: {e}")))?;

        UsersRoles::delete_many()
            .filter(UserRoleColumn::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("清除用户角色失败: {e}")))?;

        let result = Users::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("删除用户失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ScoalaError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 为用户添加角色
    pub async fn add_role_to_user_impl(&self, user_id: &str, role_id: &str) -> Result<bool> {
        let existing = UsersRoles::find_by_id((user_id.to_string(), role_id.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("查询用户角色失败: {e}")))?;
        if existing.is_some() {
            return Ok(false);
        }

        Self::insert_user_roles(&self.db, user_id, &[role_id.to_string()]).await?;
        Ok(true)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| ScoalaError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    async fn insert_user_roles<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        role_ids: &[String],
    ) -> Result<()> {
        for role_id in role_ids {
            let link = UserRoleActiveModel {
                user_id: Set(user_id.to_string()),
                role_id: Set(role_id.clone()),
            };
            UsersRoles::insert(link)
                .exec_without_returning(db)
                .await
                .map_err(|e| ScoalaError::database_operation(format!("关联用户角色失败: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::entities::RoleName;
    use crate::testing::memory_storage;

    fn new_user(username: &str, role_ids: &[String]) -> NewUser {
        NewUser {
            name: username.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role_ids: role_ids.to_vec(),
        }
    }

    #[actix_web::test]
    async fn test_duplicate_username_insert_is_conflict() {
        let storage = memory_storage().await;
        storage.create_user(new_user("ana", &[])).await.unwrap();

        let err = storage.create_user(new_user("ana", &[])).await.unwrap_err();
        assert!(matches!(err, ScoalaError::UserUsernameAlreadyUsed(_)));
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_users_listed_in_creation_order() {
        let storage = memory_storage().await;
        let role = storage.create_role(RoleName::STUDENT).await.unwrap();
        let role_ids = vec![role.id];
        for i in 0..6 {
            storage
                .create_user(new_user(&format!("u{i}"), &role_ids))
                .await
                .unwrap();
        }

        let key = |u: &User| (u.created_at, u.id.clone());
        for users in [
            storage.list_users().await.unwrap(),
            storage.list_users_by_role(&role_ids[0]).await.unwrap(),
        ] {
            assert_eq!(users.len(), 6);
            assert!(users.windows(2).all(|w| key(&w[0]) <= key(&w[1])));
            assert!(users.iter().all(|u| u.roles.len() == 1));
        }
    }
}
