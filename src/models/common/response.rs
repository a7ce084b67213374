use serde::{Deserialize, Serialize};

use crate::errors::ScoalaError;

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorResponse {
    pub fn from_error(err: &ScoalaError) -> Self {
        Self {
            code: err.code().to_string(),
            error: err.error_type().to_string(),
            message: err.message().to_string(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
