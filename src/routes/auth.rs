use actix_web::{HttpRequest, HttpResponse, ResponseError, Result as ActixResult, web};
use tracing::warn;

use crate::errors::ScoalaError;
use crate::middlewares::{self, RateLimit};
use crate::models::auth::{LoginRequest, RegisterRequest};
use crate::services::{AuthService, UserService};
use crate::utils::jwt::JwtUtils;

/// 认证接口的限流器，在应用工厂外创建以便各 worker 共享计数
#[derive(Clone)]
pub struct AuthRateLimits {
    pub login: RateLimit,
    pub register: RateLimit,
    pub refresh: RateLimit,
}

impl Default for AuthRateLimits {
    fn default() -> Self {
        Self {
            login: RateLimit::login(),
            register: RateLimit::register(),
            refresh: RateLimit::refresh_token(),
        }
    }
}

pub async fn login(
    auth: web::Data<AuthService>,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let outcome = auth.login(user_data.into_inner()).await?;
    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&outcome.refresh_token);

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(outcome.response))
}

pub async fn register(
    users: web::Data<UserService>,
    form: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    let user = users.register(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn refresh_token(
    auth: web::Data<AuthService>,
    request: HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(&request) else {
        return Err(ScoalaError::authentication("Unauthorized access, please login").into());
    };

    match auth.refresh_token(&refresh_token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(err @ ScoalaError::Authentication(_)) => {
            // 清除无效的 refresh token cookie
            let mut response = err.error_response();
            if let Err(e) = response.add_cookie(&JwtUtils::create_empty_refresh_token_cookie()) {
                warn!("Failed to clear refresh token cookie: {}", e);
            }
            Ok(response)
        }
        Err(err) => Err(err.into()),
    }
}

/// 通过设置过期的 refresh_token cookie 清除客户端登录状态
pub async fn logout() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .finish())
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    let user = middlewares::RequireJWT::extract_user(&request)
        .ok_or_else(|| ScoalaError::authentication("Unauthorized access, please login"))?;
    Ok(HttpResponse::Ok().json(user))
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, limits: &AuthRateLimits) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(limits.login.clone())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/register")
                    .wrap(limits.register.clone())
                    .route(web::post().to(register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(limits.refresh.clone())
                    .route(web::post().to(refresh_token)),
            )
            .route("/logout", web::post().to(logout))
            .service(
                web::resource("/me")
                    .wrap(middlewares::RequireJWT)
                    .route(web::get().to(me)),
            ),
    );
}
