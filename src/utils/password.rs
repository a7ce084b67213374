use crate::config::AppConfig;
use crate::errors::ScoalaError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::Lazy;

// 与真实用户使用相同参数的占位哈希
static PLACEHOLDER_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("scoalaonline-placeholder").ok());

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, ScoalaError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| ScoalaError::password_hash(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ScoalaError::password_hash(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，参数从哈希串中读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 用户不存在时执行一次等价的校验，使响应耗时与密码错误一致
pub fn verify_password_for_unknown_user(password: &str) -> bool {
    if let Some(hash) = PLACEHOLDER_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Secret123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Secret123", &hash));
        assert!(!verify_password("secret123", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "plain-text"));
    }

    #[test]
    fn test_unknown_user_check_runs_argon2_and_fails() {
        let hash = PLACEHOLDER_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password_for_unknown_user("scoalaonline-placeholder"));
        assert!(!verify_password_for_unknown_user("Secret123"));
    }
}
