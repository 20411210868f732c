use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{created, deleted, ok};
use crate::middlewares::{RequireRole, RequireSession};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    class_sections::requests::{CreateClassSectionRequest, UpdateClassSectionRequest},
    courses::requests::{CreateCourseRequest, UpdateCourseRequest},
    enrollments::requests::EnrollRequest,
    instructors::requests::{CreateInstructorRequest, UpdateInstructorRequest},
    schedules::requests::CreateScheduleSlotRequest,
    students::requests::{CreateStudentRequest, UpdateStudentRequest},
};
use crate::services::AdminService;

const DASHBOARD: &str = "/api/v1/admin/dashboard";
const STUDENTS: &str = "/api/v1/admin/students";
const INSTRUCTORS: &str = "/api/v1/admin/instructors";
const COURSES: &str = "/api/v1/admin/courses";
const CLASSES: &str = "/api/v1/admin/classes";
const SCHEDULES: &str = "/api/v1/admin/schedules";

type Admin = web::Data<AdminService>;

pub async fn dashboard(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.dashboard(&identity).await, &identity, DASHBOARD, "OK")
}

// 学生
pub async fn list_students(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.list_students(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn create_student(
    service: Admin,
    identity: Identity,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create_student(&identity, body.into_inner()).await;
    created(result, &identity, STUDENTS, "Student created")
}

pub async fn get_student(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.get_student(&identity, id.into_inner()).await;
    ok(result, &identity, STUDENTS, "OK")
}

pub async fn update_student(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update_student(&identity, id.into_inner(), body.into_inner())
        .await;
    ok(result, &identity, STUDENTS, "Student updated")
}

pub async fn delete_student(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.delete_student(&identity, id.into_inner()).await;
    deleted(result, &identity, STUDENTS, "Student deleted")
}

// 教师
pub async fn list_instructors(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.list_instructors(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn create_instructor(
    service: Admin,
    identity: Identity,
    body: web::Json<CreateInstructorRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create_instructor(&identity, body.into_inner()).await;
    created(result, &identity, INSTRUCTORS, "Instructor created")
}

pub async fn get_instructor(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.get_instructor(&identity, id.into_inner()).await;
    ok(result, &identity, INSTRUCTORS, "OK")
}

pub async fn update_instructor(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
    body: web::Json<UpdateInstructorRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update_instructor(&identity, id.into_inner(), body.into_inner())
        .await;
    ok(result, &identity, INSTRUCTORS, "Instructor updated")
}

pub async fn delete_instructor(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.delete_instructor(&identity, id.into_inner()).await;
    deleted(result, &identity, INSTRUCTORS, "Instructor deleted")
}

// 课程
pub async fn list_courses(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.list_courses(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn course_overview(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.course_overview(&identity).await, &identity, COURSES, "OK")
}

pub async fn create_course(
    service: Admin,
    identity: Identity,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create_course(&identity, body.into_inner()).await;
    created(result, &identity, COURSES, "Course created")
}

pub async fn update_course(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update_course(&identity, id.into_inner(), body.into_inner())
        .await;
    ok(result, &identity, COURSES, "Course updated")
}

pub async fn delete_course(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.delete_course(&identity, id.into_inner()).await;
    deleted(result, &identity, COURSES, "Course deleted")
}

// 教学班
pub async fn list_classes(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.list_class_sections(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn create_class(
    service: Admin,
    identity: Identity,
    body: web::Json<CreateClassSectionRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create_class_section(&identity, body.into_inner()).await;
    created(result, &identity, CLASSES, "Class section created")
}

pub async fn get_class(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.class_section_detail(&identity, id.into_inner()).await;
    ok(result, &identity, CLASSES, "OK")
}

pub async fn update_class(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
    body: web::Json<UpdateClassSectionRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .update_class_section(&identity, id.into_inner(), body.into_inner())
        .await;
    ok(result, &identity, CLASSES, "Class section updated")
}

pub async fn delete_class(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.delete_class_section(&identity, id.into_inner()).await;
    deleted(result, &identity, CLASSES, "Class section deleted")
}

pub async fn enroll(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
    body: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    let result = service
        .enroll(&identity, id.into_inner(), body.into_inner())
        .await;
    created(result, &identity, CLASSES, "Student enrolled")
}

pub async fn unenroll(
    service: Admin,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (class_section_id, enrollment_id) = path.into_inner();
    let result = service
        .unenroll(&identity, class_section_id, enrollment_id)
        .await;
    deleted(result, &identity, CLASSES, "Enrollment removed")
}

// 课表
pub async fn list_schedules(service: Admin, identity: Identity) -> ActixResult<HttpResponse> {
    ok(service.list_schedule_slots(&identity).await, &identity, DASHBOARD, "OK")
}

pub async fn create_schedule(
    service: Admin,
    identity: Identity,
    body: web::Json<CreateScheduleSlotRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create_schedule_slot(&identity, body.into_inner()).await;
    created(result, &identity, SCHEDULES, "Schedule slot created")
}

pub async fn delete_schedule(
    service: Admin,
    identity: Identity,
    id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let result = service.delete_schedule_slot(&identity, id.into_inner()).await;
    deleted(result, &identity, SCHEDULES, "Schedule slot deleted")
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(RequireRole::new(Role::Admin))
            .wrap(RequireSession::from_config())
            .route("/dashboard", web::get().to(dashboard))
            .service(
                web::resource("/students")
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            .service(
                web::resource("/students/{id}")
                    .route(web::get().to(get_student))
                    .route(web::put().to(update_student))
                    .route(web::delete().to(delete_student)),
            )
            .service(
                web::resource("/instructors")
                    .route(web::get().to(list_instructors))
                    .route(web::post().to(create_instructor)),
            )
            .service(
                web::resource("/instructors/{id}")
                    .route(web::get().to(get_instructor))
                    .route(web::put().to(update_instructor))
                    .route(web::delete().to(delete_instructor)),
            )
            .service(
                web::resource("/courses")
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course)),
            )
            // 需在 /courses/{id} 之前注册
            .route("/courses/overview", web::get().to(course_overview))
            .service(
                web::resource("/courses/{id}")
                    .route(web::put().to(update_course))
                    .route(web::delete().to(delete_course)),
            )
            .service(
                web::resource("/classes")
                    .route(web::get().to(list_classes))
                    .route(web::post().to(create_class)),
            )
            .service(
                web::resource("/classes/{id}")
                    .route(web::get().to(get_class))
                    .route(web::put().to(update_class))
                    .route(web::delete().to(delete_class)),
            )
            .route("/classes/{id}/enrollments", web::post().to(enroll))
            .route(
                "/classes/{id}/enrollments/{enrollment_id}",
                web::delete().to(unenroll),
            )
            .service(
                web::resource("/schedules")
                    .route(web::get().to(list_schedules))
                    .route(web::post().to(create_schedule)),
            )
            .route("/schedules/{id}", web::delete().to(delete_schedule)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{
        configure_services,
        test_support::{bearer, seeded_state},
    };
    use actix_web::{App, http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_dashboard_requires_admin() {
        let (storage, sessions) = seeded_state().await;
        let app = test::init_service(
            App::new()
                .configure(configure_services(storage, sessions.clone()))
                .configure(configure_admin_routes),
        )
        .await;

        let req = test::TestRequest::get().uri(DASHBOARD).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri(DASHBOARD)
            .insert_header(bearer(&sessions, Role::Instructor).await)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect"], "/api/v1/instructor/classes");

        let req = test::TestRequest::get()
            .uri(DASHBOARD)
            .insert_header(bearer(&sessions, Role::Admin).await)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["students"], 1);
        assert_eq!(body["data"]["class_sections"], 1);
    }

    #[actix_web::test]
    async fn test_student_crud_over_http() {
        let (storage, sessions) = seeded_state().await;
        let app = test::init_service(
            App::new()
                .configure(configure_services(storage, sessions.clone()))
                .configure(configure_admin_routes),
        )
        .await;
        let auth = bearer(&sessions, Role::Admin).await;

        let req = test::TestRequest::post()
            .uri(STUDENTS)
            .insert_header(auth.clone())
            .set_json(json!({
                "username": "student2",
                "password": "secret12",
                "display_name": "Ayu Student",
                "student_number": "20231002"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();

        // 重复用户名
        let req = test::TestRequest::post()
            .uri(STUDENTS)
            .insert_header(auth.clone())
            .set_json(json!({
                "username": "student2",
                "password": "secret12",
                "display_name": "Another",
                "student_number": "20231003"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::delete()
            .uri(&format!("{STUDENTS}/{id}"))
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("{STUDENTS}/{id}"))
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect"], STUDENTS);
    }

    #[actix_web::test]
    async fn test_overview_and_course_in_use() {
        let (storage, sessions) = seeded_state().await;
        let app = test::init_service(
            App::new()
                .configure(configure_services(storage, sessions.clone()))
                .configure(configure_admin_routes),
        )
        .await;
        let auth = bearer(&sessions, Role::Admin).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/courses/overview")
            .insert_header(auth.clone())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let course_id = body["data"][0]["course"]["id"].as_i64().unwrap();
        assert_eq!(
            body["data"][0]["sections"][0]["instructor_name"],
            "Dr. Instructor One"
        );

        let req = test::TestRequest::delete()
            .uri(&format!("{COURSES}/{course_id}"))
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let (storage, sessions) = seeded_state().await;
        let section_id = storage.list_class_sections().await.unwrap()[0].id;
        let app = test::init_service(
            App::new()
                .configure(configure_services(storage, sessions.clone()))
                .configure(configure_admin_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("{CLASSES}/{section_id}/enrollments"))
            .insert_header(bearer(&sessions, Role::Admin).await)
            .set_json(json!({ "student_id": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
