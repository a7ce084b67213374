use serde::Deserialize;

// 角色创建/更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRequest {
    pub name: Option<String>,
}
