use tracing::info;

use super::UserService;
use super::create::require_password;
use crate::errors::{Result, ScoalaError};
use crate::models::users::{
    entities::User,
    requests::{AddRoleRequest, UserChanges, UserRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::non_blank;

pub async fn update(service: &UserService, id: &str, entry: UserRequest) -> Result<User> {
    let existing = service
        .storage()
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ScoalaError::user_not_found("Method update: User not found."))?;

    let name = non_blank(entry.name.as_deref()).ok_or_else(|| {
        ScoalaError::user_invalid_name("Method update: Name field can't be empty.")
    })?;

    // 用户名不可修改，仅允许缺省或与原值相同
    if let Some(username) = non_blank(entry.username.as_deref())
        && username != existing.username
    {
        return Err(ScoalaError::user_username_not_allowed(
            "Method update: Can not change username.",
        ));
    }

    let password = require_password("update", entry.password.as_deref())?;
    let roles = service
        .resolve_roles("update", entry.roles.as_deref())
        .await?;

    let user = service
        .storage()
        .update_user(
            id,
            UserChanges {
                name: name.to_string(),
                password_hash: hash_password(password)?,
                role_ids: roles.into_iter().map(|role| role.id).collect(),
            },
        )
        .await?
        .ok_or_else(|| ScoalaError::user_not_found("Method update: User not found."))?;

    service.evict_cached_user(id).await;
    info!("User {} updated", user.username);
    Ok(user)
}

pub async fn add_role_to_user(
    service: &UserService,
    user_id: &str,
    request: AddRoleRequest,
) -> Result<User> {
    let user = service
        .storage()
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ScoalaError::user_not_found("Method addRoleToUser: User not found."))?;

    let role_name = non_blank(request.role_name.as_deref()).ok_or_else(|| {
        ScoalaError::role_invalid_name("Method addRoleToUser: Role name can't be empty.")
    })?;
    let role = service
        .storage()
        .get_role_by_name(role_name)
        .await?
        .ok_or_else(|| {
            ScoalaError::role_not_found(format!("Method addRoleToUser: Role {role_name} not found."))
        })?;

    if user.has_role(&role.name) {
        return Ok(user);
    }

    service.storage().add_role_to_user(user_id, &role.id).await?;
    service.evict_cached_user(user_id).await;
    info!("Role {} added to user {}", role.name, user.username);

    service
        .storage()
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ScoalaError::user_not_found("Method addRoleToUser: User not found."))
}
