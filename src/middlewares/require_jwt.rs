/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>` 中的 access token，
 * 并把对应的用户（含角色）放入请求扩展，供后续中间件和处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/lectures")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_lectures));
 *
 * async fn handler(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let user = RequireJWT::extract_user(&req);
 *     ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取并校验 access token（签名、过期时间、类型）
 * 2. 按 `user:{id}` 查询缓存，未命中时回源存储并写入缓存，写入后复查存储防止缓存旧数据
 * 3. 用户不存在或令牌无效时返回 401
 */

use crate::cache::{ObjectCache, get_object, insert_object, user_cache_key};
use crate::config::AppConfig;
use crate::errors::ScoalaError;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 提取并验证 JWT access token，返回当前用户
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<User, ScoalaError> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| ScoalaError::authentication("Missing or invalid Authorization header"))?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        ScoalaError::authentication("Invalid JWT token")
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ScoalaError::cache_connection("Cache not found in app data"))?;

    let cache_key = user_cache_key(&claims.sub);
    if let Some(user) = get_object::<User>(cache.as_ref(), &cache_key).await {
        return Ok(user);
    }
    debug!("User not found in cache for id: {}", claims.sub);

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| ScoalaError::database_connection("Storage not found in app data"))?;

    let user = storage
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ScoalaError::authentication("User no longer exists"))?;

    cache_principal(storage.as_ref(), cache.as_ref(), &user).await?;

    Ok(user)
}

// 写入后复查存储：读取与写入之间若用户被更新（缓存已被清除），撤销这次写入
async fn cache_principal(
    storage: &dyn Storage,
    cache: &dyn ObjectCache,
    user: &User,
) -> Result<(), ScoalaError> {
    let cache_key = user_cache_key(&user.id);
    insert_object(
        cache,
        cache_key.clone(),
        user,
        AppConfig::get().cache.default_ttl,
    )
    .await;

    let current = storage.get_user_by_id(&user.id).await?;
    if current.as_ref() != Some(user) {
        debug!("User {} changed while caching, dropping cache entry", user.id);
        cache.remove(&cache_key).await;
    }
    Ok(())
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(
                    req.into_response(HttpResponse::NoContent().finish().map_into_right_body())
                );
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(create_error_response(err).map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 仅在应用了 RequireJWT 中间件的路由中可用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::entities::RoleName;
    use crate::models::users::requests::{UserChanges, UserRequest};
    use crate::testing::test_context;

    #[actix_web::test]
    async fn test_principal_cached_when_unchanged() {
        let ctx = test_context().await;
        let user = ctx
            .users
            .add(UserRequest {
                name: Some("Ana".to_string()),
                username: Some("ana".to_string()),
                password: Some("Secret123".to_string()),
                roles: Some(vec![RoleName::STUDENT.to_string()]),
            })
            .await
            .unwrap();
        let stored = ctx.storage.get_user_by_id(&user.id).await.unwrap().unwrap();

        cache_principal(ctx.storage.as_ref(), ctx.cache.as_ref(), &stored)
            .await
            .unwrap();
        let cached: Option<User> = get_object(ctx.cache.as_ref(), &user_cache_key(&user.id)).await;
        assert_eq!(cached.map(|u| u.id), Some(user.id));
    }

    #[actix_web::test]
    async fn test_stale_principal_not_cached() {
        let ctx = test_context().await;
        let user = ctx
            .users
            .add(UserRequest {
                name: Some("Ana".to_string()),
                username: Some("ana".to_string()),
                password: Some("Secret123".to_string()),
                roles: Some(vec![RoleName::STUDENT.to_string()]),
            })
            .await
            .unwrap();
        let stale = ctx.storage.get_user_by_id(&user.id).await.unwrap().unwrap();

        // 读取之后用户角色被修改
        let teacher = ctx.roles.get_one_by_name(RoleName::TEACHER).await.unwrap();
        ctx.storage
            .update_user(
                &user.id,
                UserChanges {
                    name: stale.name.clone(),
                    password_hash: stale.password_hash.clone(),
                    role_ids: vec![teacher.id],
                },
            )
            .await
            .unwrap();

        cache_principal(ctx.storage.as_ref(), ctx.cache.as_ref(), &stale)
            .await
            .unwrap();
        let cached: Option<User> = get_object(ctx.cache.as_ref(), &user_cache_key(&user.id)).await;
        assert!(cached.is_none());
    }
}
