pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

use actix_web::{HttpResponse, ResponseError};

use crate::errors::ScoalaError;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

// 中间件短路时使用与处理程序一致的错误响应体
pub(crate) fn create_error_response(err: ScoalaError) -> HttpResponse {
    err.error_response()
}
