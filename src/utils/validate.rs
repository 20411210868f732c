use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

/// 成绩允许的范围
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// 课程学分允许的范围
pub const CREDIT_UNITS_RANGE: std::ops::RangeInclusive<i32> = 0..=24;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：3 <= x <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线、点或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores, dots or hyphens");
    }
    Ok(())
}

/// 必填文本字段不能为空白
pub fn validate_required(field: &'static str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// 成绩必须是 0 到 100 之间的有限数值
pub fn validate_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || !SCORE_RANGE.contains(&score) {
        return Err("Score must be a number between 0 and 100");
    }
    Ok(())
}

pub fn validate_credit_units(units: i32) -> Result<(), &'static str> {
    if !CREDIT_UNITS_RANGE.contains(&units) {
        return Err("Credit units must be between 0 and 24");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合策略
///
/// 策略要求：
/// - 最小长度：6 字符
/// - 必须包含：字母 + 数字
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 6 {
        errors.push("Password must be at least 6 characters long");
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(validate_username("student1").is_ok());
        assert!(validate_username("dr.one").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("<script>").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("student123").is_valid);
        assert!(validate_password("S3cure").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 6 characters long")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("abcdefgh");
        assert!(!result.is_valid);
        assert_eq!(
            result.error_message(),
            "Password must contain at least one digit"
        );
    }

    #[test]
    fn test_scores() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(85.5).is_ok());
        assert!(validate_score(100.0).is_ok());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(f64::NAN).is_err());
        assert!(validate_score(f64::INFINITY).is_err());
    }

    #[test]
    fn test_required() {
        assert!(validate_required("Course code", "NET101").is_ok());
        assert_eq!(
            validate_required("Course code", "   "),
            Err("Course code is required".to_string())
        );
    }

    #[test]
    fn test_credit_units() {
        assert!(validate_credit_units(3).is_ok());
        assert!(validate_credit_units(-1).is_err());
        assert!(validate_credit_units(25).is_err());
    }
}
