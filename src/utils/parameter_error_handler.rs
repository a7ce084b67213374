//! 请求参数解析失败时的统一处理
//!
//! 将 actix 的 JSON / Query / Path 解析错误转换为 `ScoalaError::Validation`，
//! 保证返回与业务错误一致的 400 响应体。

use actix_web::{
    HttpRequest,
    error::{JsonPayloadError, PathError, QueryPayloadError},
};
use tracing::debug;

use crate::errors::ScoalaError;

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload error on {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        _ => format!("Invalid JSON body: {err}"),
    };
    ScoalaError::validation(message).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query error on {}: {}", req.path(), err);
    ScoalaError::validation(format!("Invalid query parameters: {err}")).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("Path error on {}: {}", req.path(), err);
    ScoalaError::validation(format!("Invalid path parameters: {err}")).into()
}
