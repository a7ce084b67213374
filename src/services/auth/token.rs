use tracing::info;

use super::AuthService;
use crate::errors::{Result, ScoalaError};
use crate::models::auth::RefreshTokenResponse;
use crate::utils::jwt::JwtUtils;

pub async fn handle_refresh_token(
    service: &AuthService,
    refresh_token: &str,
) -> Result<RefreshTokenResponse> {
    let config = service.get_config();

    let claims = JwtUtils::verify_refresh_token(refresh_token).map_err(|e| {
        info!("Refresh token rejected: {}", e);
        ScoalaError::authentication("Login expired or invalid, please login again")
    })?;

    // 重新读取用户，使角色变更体现在新令牌中
    let user = service
        .storage()
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ScoalaError::authentication("Login expired or invalid, please login again"))?;

    let access_token = JwtUtils::generate_access_token(&user.id, &user.role_names())?;

    Ok(RefreshTokenResponse {
        access_token,
        expires_in: config.jwt.access_token_expiry * 60,
    })
}
