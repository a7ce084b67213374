use tracing::info;

use super::UserService;
use crate::errors::{Result, ScoalaError};
use crate::models::auth::RegisterRequest;
use crate::models::roles::entities::RoleName;
use crate::models::users::{
    entities::User,
    requests::{NewUser, UserRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::non_blank;

pub async fn add(service: &UserService, entry: UserRequest) -> Result<User> {
    let name = non_blank(entry.name.as_deref())
        .ok_or_else(|| ScoalaError::user_invalid_name("Method add: Name field can't be empty."))?;
    let username = non_blank(entry.username.as_deref()).ok_or_else(|| {
        ScoalaError::user_invalid_username("Method add: Username field can't be empty.")
    })?;
    ensure_username_free(service, "add", username).await?;
    let password = require_password("add", entry.password.as_deref())?;
    let roles = service
        .resolve_roles("add", entry.roles.as_deref())
        .await?;

    let user = service
        .storage()
        .create_user(NewUser {
            name: name.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role_ids: roles.into_iter().map(|role| role.id).collect(),
        })
        .await?;

    info!("User {} created with roles {:?}", user.username, user.role_names());
    Ok(user)
}

pub async fn register(service: &UserService, form: RegisterRequest) -> Result<User> {
    let name = non_blank(form.name.as_deref()).ok_or_else(|| {
        ScoalaError::user_invalid_name("Method register: Name field can't be empty.")
    })?;
    let username = non_blank(form.username.as_deref()).ok_or_else(|| {
        ScoalaError::user_invalid_username("Method register: Username field can't be empty.")
    })?;
    ensure_username_free(service, "register", username).await?;
    let password = require_password("register", form.password.as_deref())?;

    let role = service
        .storage()
        .get_role_by_name(RoleName::DEFAULT)
        .await?
        .ok_or_else(|| {
            ScoalaError::role_not_found(format!(
                "Method register: Role {} not found.",
                RoleName::DEFAULT
            ))
        })?;

    let user = service
        .storage()
        .create_user(NewUser {
            name: name.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role_ids: vec![role.id],
        })
        .await?;

    info!("User {} registered", user.username);
    Ok(user)
}

async fn ensure_username_free(service: &UserService, operation: &str, username: &str) -> Result<()> {
    if service.storage().username_exists(username).await? {
        return Err(ScoalaError::user_username_already_used(format!(
            "Method {operation}: Username is already used."
        )));
    }
    Ok(())
}

// 密码只做非空校验，原样参与哈希
pub(super) fn require_password<'a>(operation: &str, password: Option<&'a str>) -> Result<&'a str> {
    match password {
        Some(p) if !p.trim().is_empty() => Ok(p),
        _ => Err(ScoalaError::user_invalid_password(format!(
            "Method {operation}: Password field can't be empty."
        ))),
    }
}
