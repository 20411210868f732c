use crate::config::AppConfig;
use crate::errors::SimsError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::Lazy;

// 与真实账号使用相同参数的固定摘要
static DUMMY_DIGEST: Lazy<Option<String>> =
    Lazy::new(|| hash_password("sims-placeholder-password").ok());

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, SimsError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| SimsError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SimsError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码
///
/// 摘要中自带参数，无法解析的摘要一律视为不匹配。
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 账号不存在时执行一次同等耗时的校验，结果总是不匹配
pub fn verify_dummy_password(password: &str) -> bool {
    if let Some(digest) = DUMMY_DIGEST.as_deref() {
        let _ = verify_password(password, digest);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let digest = hash_password("student123").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("student123", &digest));
        assert!(!verify_password("student124", &digest));
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let first = hash_password("admin123").unwrap();
        let second = hash_password("admin123").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("admin123", &first));
        assert!(verify_password("admin123", &second));
    }

    #[test]
    fn test_garbage_digest_never_verifies() {
        assert!(!verify_password("admin123", "admin123"));
        assert!(!verify_password("admin123", ""));
    }

    #[test]
    fn test_dummy_verification_never_matches() {
        let digest = DUMMY_DIGEST.as_deref().unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(!verify_dummy_password("admin123"));
        assert!(!verify_dummy_password("sims-placeholder-password"));
    }
}
