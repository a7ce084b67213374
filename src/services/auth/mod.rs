pub mod login;
pub mod token;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::auth::{LoginRequest, LoginResponse, RefreshTokenResponse};
use crate::storage::Storage;

/// 登录结果：响应体与需写入 cookie 的 refresh token
pub struct LoginOutcome {
    pub response: LoginResponse,
    pub refresh_token: String,
}

pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(&self, login_request: LoginRequest) -> Result<LoginOutcome> {
        login::handle_login(self, login_request).await
    }

    // 使用 refresh token 换取新的 access token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
        token::handle_refresh_token(self, refresh_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScoalaError;
    use crate::models::roles::entities::RoleName;
    use crate::models::users::requests::UserRequest;
    use crate::testing::test_context;
    use crate::utils::jwt::JwtUtils;

    async fn seed_user(ctx: &crate::testing::TestContext) -> String {
        ctx.users
            .add(UserRequest {
                name: Some("Ana".to_string()),
                username: Some("ana".to_string()),
                password: Some("Secret123".to_string()),
                roles: Some(vec![RoleName::TEACHER.to_string()]),
            })
            .await
            .unwrap()
            .id
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_login_issues_tokens() {
        let ctx = test_context().await;
        let user_id = seed_user(&ctx).await;

        let outcome = ctx.auth.login(login_request("ana", "Secret123")).await.unwrap();
        assert_eq!(outcome.response.user.id, user_id);

        let claims = JwtUtils::verify_access_token(&outcome.response.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.roles, vec![RoleName::TEACHER.to_string()]);
        assert!(JwtUtils::verify_refresh_token(&outcome.refresh_token).is_ok());
    }

    #[actix_web::test]
    async fn test_login_rejects_bad_credentials() {
        let ctx = test_context().await;
        seed_user(&ctx).await;

        let err = ctx
            .auth
            .login(login_request("ana", "wrong"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScoalaError::Authentication(_)));

        let err = ctx
            .auth
            .login(login_request("nobody", "Secret123"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScoalaError::Authentication(_)));
    }

    #[actix_web::test]
    async fn test_refresh_token() {
        let ctx = test_context().await;
        let user_id = seed_user(&ctx).await;
        let outcome = ctx.auth.login(login_request("ana", "Secret123")).await.unwrap();

        let refreshed = ctx.auth.refresh_token(&outcome.refresh_token).await.unwrap();
        let claims = JwtUtils::verify_access_token(&refreshed.access_token).unwrap();
        assert_eq!(claims.sub, user_id);

        // access token 不能用于刷新
        let err = ctx
            .auth
            .refresh_token(&outcome.response.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoalaError::Authentication(_)));

        // 用户删除后 refresh token 失效
        ctx.users.delete(&user_id).await.unwrap();
        let err = ctx.auth.refresh_token(&outcome.refresh_token).await.unwrap_err();
        assert!(matches!(err, ScoalaError::Authentication(_)));
    }
}
