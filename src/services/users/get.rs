use super::UserService;
use crate::errors::{Result, ScoalaError};
use crate::models::users::entities::User;

pub async fn get_one_by_id(service: &UserService, id: &str) -> Result<User> {
    service
        .storage()
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ScoalaError::user_not_found("Method getOneById: User not found."))
}

pub async fn get_one_by_username(service: &UserService, username: &str) -> Result<User> {
    service
        .storage()
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| ScoalaError::user_not_found("Method getOneByUsername: User not found."))
}
