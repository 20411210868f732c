use actix_web::{HttpResponse, Result as ActixResult, web};

use super::ok;
use crate::middlewares::{RequireRole, RequireSession};
use crate::models::{accounts::entities::Role, auth::Identity};
use crate::services::StudentService;

const DASHBOARD: &str = "/api/v1/student/dashboard";

pub async fn dashboard(
    service: web::Data<StudentService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    ok(service.dashboard(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn profile(
    service: web::Data<StudentService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    ok(service.profile(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn enrollments(
    service: web::Data<StudentService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    ok(service.enrollments(&identity).await, &identity, DASHBOARD, "OK")
}

// 配置路由，学生只有只读接口
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .wrap(RequireRole::new(Role::Student))
            .wrap(RequireSession::from_config())
            .route("/dashboard", web::get().to(dashboard))
            .route("/profile", web::get().to(profile))
            .route("/enrollments", web::get().to(enrollments)),
    );
}
