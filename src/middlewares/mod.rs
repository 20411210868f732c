pub mod rate_limit;
pub mod require_role;
pub mod require_session;

use actix_web::HttpResponse;

use crate::errors::SimsError;

pub use rate_limit::RateLimit;
pub use require_role::RequireRole;
pub use require_session::{RequireSession, SessionToken};

// 守卫拒绝时的统一响应，附带客户端应跳转的路径
fn create_error_response(err: &SimsError, redirect: &str) -> HttpResponse {
    err.to_http_response(Some(redirect))
}
