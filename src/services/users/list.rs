use super::UserService;
use crate::errors::Result;
use crate::models::users::entities::User;

pub async fn get_all(service: &UserService) -> Result<Vec<User>> {
    service.storage().list_users().await
}

// 角色不存在时没有成员，返回空列表
pub async fn get_all_by_role(service: &UserService, role_name: &str) -> Result<Vec<User>> {
    match service.storage().get_role_by_name(role_name.trim()).await? {
        Some(role) => service.storage().list_users_by_role(&role.id).await,
        None => Ok(Vec::new()),
    }
}
