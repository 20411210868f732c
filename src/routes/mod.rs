pub mod admin;
pub mod auth;
pub mod instructor;
pub mod student;

use std::sync::Arc;

use actix_web::{HttpResponse, ResponseError, Result as ActixResult, http::StatusCode, web};
use serde::Serialize;
use tracing::error;

use crate::errors::{Result, SimsError};
use crate::models::{ApiResponse, auth::Identity};
use crate::services::auth::{LOGIN_PATH, SessionStore};
use crate::services::{AdminService, AuthService, InstructorService, StudentService};
use crate::storage::Storage;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use instructor::configure_instructor_routes;
pub use student::configure_student_routes;

/// 注册会话存储与各角色的业务服务，供中间件和处理函数提取
pub fn configure_services(
    storage: Arc<dyn Storage>,
    sessions: SessionStore,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(AuthService::new(
                storage.clone(),
                sessions.clone(),
            )))
            .app_data(web::Data::new(AdminService::new(storage.clone())))
            .app_data(web::Data::new(InstructorService::new(storage.clone())))
            .app_data(web::Data::new(StudentService::new(storage.clone())));
    }
}

/// 业务错误转换为响应
///
/// 未登录跳转登录入口，越权跳转当前角色首页，记录不存在跳转对应的列表页。
pub(crate) fn reject(err: &SimsError, identity: &Identity, listing: &str) -> HttpResponse {
    let redirect = match err {
        SimsError::Authentication(_) => Some(LOGIN_PATH),
        SimsError::Authorization(_) => Some(identity.role.home_path()),
        SimsError::NotFound(_) => Some(listing),
        _ => None,
    };
    if err.status_code().is_server_error() {
        error!("Request by account {} failed: {}", identity.account_id, err);
    }
    err.to_http_response(redirect)
}

fn respond<T: Serialize>(
    status: StatusCode,
    result: Result<T>,
    identity: &Identity,
    listing: &str,
    message: &str,
) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(data) => HttpResponse::build(status).json(ApiResponse::success(data, message)),
        Err(err) => reject(&err, identity, listing),
    })
}

pub(crate) fn ok<T: Serialize>(
    result: Result<T>,
    identity: &Identity,
    listing: &str,
    message: &str,
) -> ActixResult<HttpResponse> {
    respond(StatusCode::OK, result, identity, listing, message)
}

pub(crate) fn created<T: Serialize>(
    result: Result<T>,
    identity: &Identity,
    listing: &str,
    message: &str,
) -> ActixResult<HttpResponse> {
    respond(StatusCode::CREATED, result, identity, listing, message)
}

pub(crate) fn deleted(
    result: Result<()>,
    identity: &Identity,
    listing: &str,
    message: &str,
) -> ActixResult<HttpResponse> {
    Ok(match result {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success_empty(message)),
        Err(err) => reject(&err, identity, listing),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::cache::MokaCacheWrapper;
    use crate::models::{accounts::entities::Role, auth::Identity};
    use crate::runtime::lifetime::startup::test_support::seeded_storage;
    use crate::services::auth::SessionStore;
    use crate::storage::Storage;

    /// 演示数据与一个空的会话存储
    pub(crate) async fn seeded_state() -> (Arc<dyn Storage>, SessionStore) {
        let sessions = SessionStore::new(Arc::new(MokaCacheWrapper::new(100, 600)), 600);
        (seeded_storage().await, sessions)
    }

    /// 直接为演示账号创建会话，返回 Bearer 请求头
    pub(crate) async fn bearer(sessions: &SessionStore, role: Role) -> (&'static str, String) {
        let identity = match role {
            Role::Admin => Identity::new(1, Role::Admin, "Administrator"),
            Role::Instructor => Identity::new(2, Role::Instructor, "Dr. Instructor One"),
            Role::Student => Identity::new(3, Role::Student, "Budi Student"),
        };
        let token = sessions.create(&identity).await.expect("session created");
        ("Authorization", format!("Bearer {token}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::entities::Role;

    #[test]
    fn test_redirect_hints_follow_error_kind() {
        let student = Identity::new(3, Role::Student, "Budi Student");

        let resp = reject(&SimsError::authorization("no"), &student, "/listing");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = reject(&SimsError::not_found("gone"), &student, "/listing");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = reject(&SimsError::conflict("dup"), &student, "/listing");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = reject(
            &SimsError::database_operation("disk full"),
            &student,
            "/listing",
        );
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
