use serde::{Deserialize, Serialize};

// 角色实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// 内置角色名称
pub struct RoleName;

impl RoleName {
    pub const STUDENT: &'static str = "ROLE_STUDENT";
    pub const TEACHER: &'static str = "ROLE_TEACHER";
    pub const ADMIN: &'static str = "ROLE_ADMIN";

    /// 自助注册用户获得的角色
    pub const DEFAULT: &'static str = Self::STUDENT;

    pub fn builtin() -> &'static [&'static str] {
        &[Self::STUDENT, Self::TEACHER, Self::ADMIN]
    }
    pub fn admin_roles() -> &'static [&'static str] {
        &[Self::ADMIN]
    }
    pub fn staff_roles() -> &'static [&'static str] {
        &[Self::TEACHER, Self::ADMIN]
    }
}
