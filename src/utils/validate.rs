use once_cell::sync::Lazy;
use regex::Regex;

static ROLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ROLE_[A-Z_]+$").expect("Invalid role name regex"));

/// 取出非空白字段（去除首尾空白），缺失或全空白时返回 None
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 角色名称格式：ROLE_ 前缀加大写字母或下划线
pub fn validate_role_name(name: &str) -> Result<(), &'static str> {
    if !ROLE_NAME_RE.is_match(name) {
        return Err("Role name must match ROLE_[A-Z_]+");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ana ")), Some("ana"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_role_names() {
        assert!(validate_role_name("ROLE_STUDENT").is_ok());
        assert!(validate_role_name("ROLE_TEACHING_ASSISTANT").is_ok());
        assert!(validate_role_name("ROLE_").is_err());
        assert!(validate_role_name("role_student").is_err());
        assert!(validate_role_name("STUDENT").is_err());
        assert!(validate_role_name("ROLE_STUDENT1").is_err());
    }
}
