use tracing::{error, info};

use super::{AuthService, LoginOutcome};
use crate::errors::{Result, ScoalaError};
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::{verify_password, verify_password_for_unknown_user};

const INVALID_CREDENTIALS: &str = "Username or password is incorrect";

pub async fn handle_login(service: &AuthService, login_request: LoginRequest) -> Result<LoginOutcome> {
    let config = service.get_config();

    // 按用户名加载用户
    let Some(user) = service
        .storage()
        .get_user_by_username(login_request.username.trim())
        .await?
    else {
        verify_password_for_unknown_user(&login_request.password);
        info!("Failed login attempt for unknown user");
        return Err(ScoalaError::authentication(INVALID_CREDENTIALS));
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for user {}", user.username);
        return Err(ScoalaError::authentication(INVALID_CREDENTIALS));
    }

    let token_pair = JwtUtils::generate_token_pair(&user.id, &user.role_names()).map_err(|e| {
        error!("Failed to generate JWT token: {}", e);
        ScoalaError::token("Login failed, unable to generate token")
    })?;

    info!("User {} logged in successfully", user.username);

    Ok(LoginOutcome {
        response: LoginResponse {
            access_token: token_pair.access_token,
            expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
            user,
            created_at: chrono::Utc::now(),
        },
        refresh_token: token_pair.refresh_token,
    })
}
