use serde::{Deserialize, Serialize};

use crate::errors::{Result, SimsError};
use crate::models::accounts::entities::{Account, Role};

/// 会话中保存的身份信息
///
/// 由会话中间件解析后显式传给每一个业务调用，业务层不读取任何隐式的请求状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub account_id: i64,
    pub role: Role,
    pub display_name: String,
}

impl Identity {
    pub fn new(account_id: i64, role: Role, display_name: impl Into<String>) -> Self {
        Self {
            account_id,
            role,
            display_name: display_name.into(),
        }
    }

    /// 要求当前身份为指定角色
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(SimsError::authorization(format!(
                "Access denied: {role} role required"
            )))
        }
    }
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Self::new(account.id, account.role, account.display_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let identity = Identity::new(7, Role::Instructor, "Dr. Instructor One");
        assert!(identity.require_role(Role::Instructor).is_ok());

        let err = identity.require_role(Role::Admin).unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));
        assert_eq!(err.message(), "Access denied: admin role required");
    }
}
