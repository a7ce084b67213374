/*!
 * 速率限制中间件
 *
 * 限制认证接口的请求频率，防止暴力破解。
 *
 * ```rust,ignore
 * web::scope("/auth")
 *     .service(
 *         web::resource("/login")
 *             .wrap(RateLimit::login())
 *             .route(web::post().to(login)),
 *     )
 * ```
 *
 * - 以客户端 IP（已认证时为用户 ID）作为限制键
 * - 固定时间窗口计数，窗口到期后重置
 * - 超过限制返回 429 Too Many Requests
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::ScoalaError;
use crate::models::users::entities::User;

/// 速率限制配置
///
/// 克隆共享同一份计数表，在应用工厂外创建即可跨 worker 生效。
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
    /// 键 -> (计数, 窗口开始时间)
    counters: Cache<String, (u32, Instant)>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
            counters: Cache::builder()
                .time_to_live(Duration::from_secs(window_secs.max(1)))
                .max_capacity(100_000)
                .build(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制，次数与窗口取自 security 配置
    pub fn login() -> Self {
        let security = &AppConfig::get().security;
        Self::new(security.auth_rate_limit, security.auth_rate_window).with_prefix("login")
    }

    /// 注册端点限制
    pub fn register() -> Self {
        let security = &AppConfig::get().security;
        Self::new(security.auth_rate_limit, security.auth_rate_window).with_prefix("register")
    }

    /// 刷新令牌限制
    pub fn refresh_token() -> Self {
        let security = &AppConfig::get().security;
        Self::new(security.auth_rate_limit * 2, security.auth_rate_window)
            .with_prefix("refresh")
    }
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理后时需由代理设置 X-Forwarded-For / X-Real-IP。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

fn extract_user_id(req: &ServiceRequest) -> Option<String> {
    req.extensions().get::<User>().map(|user| user.id.clone())
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let config = self.config.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if config.key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", config.key_prefix, identifier)
            };

            let window = Duration::from_secs(config.window_secs);
            let now = Instant::now();
            let (count, started) = match config.counters.get(&cache_key).await {
                Some((count, started)) if now.duration_since(started) < window => (count, started),
                _ => (0, now),
            };

            if count >= config.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, count, config.max_requests
                );
                let retry_after = window.saturating_sub(now.duration_since(started)).as_secs();
                let mut response =
                    ScoalaError::rate_limited("Too many requests, please try again later")
                        .error_response();
                if let Ok(value) = retry_after.max(1).to_string().parse() {
                    response
                        .headers_mut()
                        .insert(actix_web::http::header::RETRY_AFTER, value);
                }
                return Ok(req.into_response(response.map_into_right_body()));
            }

            config.counters.insert(cache_key, (count + 1, started)).await;

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    #[actix_web::test]
    async fn test_presets_follow_security_config() {
        let security = &AppConfig::get().security;
        let login = RateLimit::login();
        assert_eq!(login.max_requests, security.auth_rate_limit);
        assert_eq!(login.window_secs, security.auth_rate_window);
        assert_eq!(login.key_prefix, "login");

        let refresh = RateLimit::refresh_token();
        assert_eq!(refresh.max_requests, security.auth_rate_limit * 2);
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(2, 60).with_prefix("test"))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::get().uri("/limited").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get().uri("/limited").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));
    }
}
