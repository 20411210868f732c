use actix_web::{HttpResponse, Result as ActixResult, web};

use super::ok;
use crate::middlewares::{RequireRole, RequireSession};
use crate::models::{accounts::entities::Role, auth::Identity, grades::requests::SetGradeRequest};
use crate::services::InstructorService;

const CLASSES: &str = "/api/v1/instructor/classes";

pub async fn list_classes(
    service: web::Data<InstructorService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    ok(service.list_own_classes(&identity).await, &identity, CLASSES, "OK")
}

pub async fn class_roster(
    service: web::Data<InstructorService>,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.class_roster(&identity, id.into_inner()).await;
    ok(result, &identity, CLASSES, "OK")
}

pub async fn grading_detail(
    service: web::Data<InstructorService>,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.grading_detail(&identity, id.into_inner()).await;
    ok(result, &identity, CLASSES, "OK")
}

pub async fn set_grade(
    service: web::Data<InstructorService>,
    identity: Identity,
    id: web::Path<i64>,
    body: web::Json<SetGradeRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .set_grade(&identity, id.into_inner(), body.into_inner())
        .await;
    ok(result, &identity, CLASSES, "Grade saved")
}

// 配置路由
pub fn configure_instructor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/instructor")
            .wrap(RequireRole::new(Role::Instructor))
            .wrap(RequireSession::from_config())
            .route("/classes", web::get().to(list_classes))
            .route("/classes/{id}", web::get().to(class_roster))
            .route("/enrollments/{id}", web::get().to(grading_detail))
            .route("/enrollments/{id}/grade", web::put().to(set_grade)),
    );
}
