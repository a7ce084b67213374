use serde::{Deserialize, Serialize};

use crate::models::roles::entities::Role;

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.name.clone()).collect()
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role.name == role_name)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, role_names: &[S]) -> bool {
        role_names.iter().any(|name| self.has_role(name.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(names: &[&str]) -> User {
        User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            username: "ana".to_string(),
            password_hash: "secret-hash".to_string(),
            roles: names
                .iter()
                .enumerate()
                .map(|(i, name)| Role {
                    id: format!("r{i}"),
                    name: name.to_string(),
                })
                .collect(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_checks() {
        let user = user_with_roles(&["ROLE_STUDENT", "ROLE_TEACHER"]);
        assert!(user.has_role("ROLE_TEACHER"));
        assert!(!user.has_role("ROLE_ADMIN"));
        assert!(user.has_any_role(&["ROLE_ADMIN", "ROLE_STUDENT"]));
        assert!(!user.has_any_role(&["ROLE_ADMIN"]));
        assert_eq!(user.role_names(), vec!["ROLE_STUDENT", "ROLE_TEACHER"]);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = user_with_roles(&["ROLE_STUDENT"]);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ana");
        assert_eq!(json["roles"][0]["name"], "ROLE_STUDENT");
    }
}
