use serde::Deserialize;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
}

// 管理员创建/更新用户请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

// 为用户添加角色请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddRoleRequest {
    pub role_name: Option<String>,
}

// 新用户（用于存储层，密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role_ids: Vec<String>,
}

// 用户变更（用于存储层，用户名不可变更）
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub password_hash: String,
    pub role_ids: Vec<String>,
}
