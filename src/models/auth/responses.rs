use serde::Serialize;

use crate::models::accounts::entities::Account;
use crate::models::auth::Identity;

// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub expires_in: u64,
    pub account: Account,
    pub home: String,
}

// 当前会话信息
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub identity: Identity,
    pub home: String,
}
