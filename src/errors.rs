//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，每个变体携带错误代码、类型名称和 HTTP 状态码，
//! 并通过 `ResponseError` 直接映射为 HTTP 错误响应。

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::models::ErrorResponse;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_scoala_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum ScoalaError {
            $($variant(String),)*
        }

        impl ScoalaError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ScoalaError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ScoalaError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(ScoalaError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ScoalaError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ScoalaError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ScoalaError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_scoala_errors! {
    // 基础设施
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E002", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E003", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E004", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E005", "File Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E006", "Serialization Error", INTERNAL_SERVER_ERROR),
    PasswordHash("E007", "Password Hash Error", INTERNAL_SERVER_ERROR),
    Token("E008", "Token Error", INTERNAL_SERVER_ERROR),

    // 请求与认证
    Validation("E010", "Validation Error", BAD_REQUEST),
    Authentication("E011", "Authentication Error", UNAUTHORIZED),
    Authorization("E012", "Authorization Error", FORBIDDEN),
    RateLimited("E013", "Rate Limit Exceeded", TOO_MANY_REQUESTS),

    // 用户
    UserNotFound("E100", "User Not Found", NOT_FOUND),
    UserInvalidName("E101", "User Invalid Name", BAD_REQUEST),
    UserInvalidUsername("E102", "User Invalid Username", BAD_REQUEST),
    UserInvalidPassword("E103", "User Invalid Password", BAD_REQUEST),
    UserInvalidRoles("E104", "User Invalid Roles", BAD_REQUEST),
    UserUsernameAlreadyUsed("E105", "User Username Already Used", CONFLICT),
    UserUsernameNotAllowed("E106", "User Username Not Allowed", BAD_REQUEST),

    // 角色
    RoleNotFound("E200", "Role Not Found", NOT_FOUND),
    RoleInvalidName("E201", "Role Invalid Name", BAD_REQUEST),
    RoleNameAlreadyUsed("E202", "Role Name Already Used", CONFLICT),
    RoleProtected("E203", "Role Protected", BAD_REQUEST),

    // 课程
    LectureNotFound("E300", "Lecture Not Found", NOT_FOUND),
    LectureInvalidTitle("E301", "Lecture Invalid Title", BAD_REQUEST),

    // 课程资料
    LectureMaterialNotFound("E400", "Lecture Material Not Found", NOT_FOUND),
    LectureMaterialInvalidDocument("E401", "Lecture Material Invalid Document", BAD_REQUEST),
}

impl ScoalaError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ScoalaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ScoalaError {}

impl ResponseError for ScoalaError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(status).json(ErrorResponse::from_error(self))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ScoalaError {
    fn from(err: sea_orm::DbErr) -> Self {
        ScoalaError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ScoalaError {
    fn from(err: std::io::Error) -> Self {
        ScoalaError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ScoalaError {
    fn from(err: serde_json::Error) -> Self {
        ScoalaError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ScoalaError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ScoalaError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoalaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ScoalaError::cache_connection("test").code(), "E001");
        assert_eq!(ScoalaError::validation("test").code(), "E010");
        assert_eq!(ScoalaError::user_not_found("test").code(), "E100");
        assert_eq!(
            ScoalaError::lecture_material_invalid_document("test").code(),
            "E401"
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ScoalaError::user_invalid_name("test").error_type(),
            "User Invalid Name"
        );
        assert_eq!(
            ScoalaError::lecture_material_not_found("test").error_type(),
            "Lecture Material Not Found"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ScoalaError::user_not_found("x").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ScoalaError::lecture_invalid_title("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScoalaError::user_username_not_allowed("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScoalaError::user_username_already_used("x").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ScoalaError::role_protected("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScoalaError::authentication("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ScoalaError::authorization("x").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ScoalaError::database_operation("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = ScoalaError::role_invalid_name("Role name can't be empty");
        let formatted = err.format_simple();
        assert!(formatted.contains("Role Invalid Name"));
        assert!(formatted.contains("Role name can't be empty"));
    }

    #[test]
    fn test_db_error_conversion() {
        let err: ScoalaError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E004");
        assert!(err.message().contains("boom"));
    }
}
