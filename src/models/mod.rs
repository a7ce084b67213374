//! 数据模型定义
//!
//! 业务实体与请求/响应 DTO，按领域划分。数据库实体见 `entity` 模块。

pub mod auth;
pub mod common;
pub mod lecture_materials;
pub mod lectures;
pub mod roles;
pub mod users;

pub use common::{AppStartTime, ErrorResponse};
