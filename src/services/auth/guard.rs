//! 会话与角色守卫
//!
//! 纯函数判定：给定会话中的身份和路由要求的角色，决定放行、要求登录还是拒绝访问。
//! 中间件与业务层共用这一判定。

use crate::errors::SimsError;
use crate::models::{accounts::entities::Role, auth::Identity};

/// 登录入口
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// 守卫拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    /// 没有有效会话
    Unauthenticated,
    /// 已登录但角色不符，`home` 为当前身份的角色首页
    Forbidden { required: Role, home: &'static str },
}

impl GuardRejection {
    /// 客户端应跳转的路径
    pub fn redirect(&self) -> &'static str {
        match self {
            GuardRejection::Unauthenticated => LOGIN_PATH,
            GuardRejection::Forbidden { home, .. } => home,
        }
    }

    pub fn to_error(&self) -> SimsError {
        match self {
            GuardRejection::Unauthenticated => {
                SimsError::authentication("Please log in to continue")
            }
            GuardRejection::Forbidden { required, .. } => {
                SimsError::authorization(format!("Access denied: {required} role required"))
            }
        }
    }
}

/// 判定会话能否访问要求指定角色的路由，`required` 为 `None` 时只要求已登录
pub fn authorize(
    session: Option<&Identity>,
    required: Option<Role>,
) -> std::result::Result<Identity, GuardRejection> {
    let identity = session.ok_or(GuardRejection::Unauthenticated)?;

    match required {
        Some(role) if identity.role != role => Err(GuardRejection::Forbidden {
            required: role,
            home: identity.role.home_path(),
        }),
        _ => Ok(identity.clone()),
    }
}
