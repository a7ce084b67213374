use std::sync::Arc;

use crate::models::{
    lecture_materials::{entities::LectureMaterial, requests::NewLectureMaterial},
    lectures::{entities::Lecture, requests::NewLecture},
    roles::entities::Role,
    users::{
        entities::User,
        requests::{NewUser, UserChanges},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户并关联角色
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 用户名是否已被使用
    async fn username_exists(&self, username: &str) -> Result<bool>;
    // 列出全部用户
    async fn list_users(&self) -> Result<Vec<User>>;
    // 列出拥有指定角色的用户
    async fn list_users_by_role(&self, role_id: &str) -> Result<Vec<User>>;
    // 更新用户信息并替换角色
    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: &str) -> Result<bool>;
    // 为用户添加角色，已拥有时返回 false
    async fn add_role_to_user(&self, user_id: &str, role_id: &str) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 角色管理方法
    async fn create_role(&self, name: &str) -> Result<Role>;
    async fn get_role_by_id(&self, id: &str) -> Result<Option<Role>>;
    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>>;
    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn update_role(&self, id: &str, name: &str) -> Result<Option<Role>>;
    async fn delete_role(&self, id: &str) -> Result<bool>;

    /// 课程管理方法
    async fn create_lecture(&self, lecture: NewLecture) -> Result<Lecture>;
    async fn get_lecture_by_id(&self, id: &str) -> Result<Option<Lecture>>;
    async fn list_lectures(&self) -> Result<Vec<Lecture>>;
    async fn update_lecture(&self, id: &str, lecture: NewLecture) -> Result<Option<Lecture>>;
    // 删除课程，其资料的 lecture_id 置空
    async fn delete_lecture(&self, id: &str) -> Result<bool>;

    /// 课程资料管理方法
    async fn create_lecture_material(&self, material: NewLectureMaterial)
    -> Result<LectureMaterial>;
    async fn get_lecture_material_by_id(&self, id: &str) -> Result<Option<LectureMaterial>>;
    async fn list_lecture_materials(&self) -> Result<Vec<LectureMaterial>>;
    async fn list_lecture_materials_by_lecture(
        &self,
        lecture_id: &str,
    ) -> Result<Vec<LectureMaterial>>;
    async fn update_lecture_material(
        &self,
        id: &str,
        material: NewLectureMaterial,
    ) -> Result<Option<LectureMaterial>>;
    async fn delete_lecture_material(&self, id: &str) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
