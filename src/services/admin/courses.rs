use tracing::info;

use super::AdminService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    courses::{
        entities::{Course, CourseOverview},
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
};
use crate::utils::validate::{validate_credit_units, validate_required};

pub async fn list_courses(service: &AdminService, identity: &Identity) -> Result<Vec<Course>> {
    identity.require_role(Role::Admin)?;
    service.storage().list_courses().await
}

/// 课程总览：课程、教学班与任课教师
pub async fn course_overview(
    service: &AdminService,
    identity: &Identity,
) -> Result<Vec<CourseOverview>> {
    identity.require_role(Role::Admin)?;
    service.storage().list_course_overview().await
}

pub async fn create_course(
    service: &AdminService,
    identity: &Identity,
    mut request: CreateCourseRequest,
) -> Result<Course> {
    identity.require_role(Role::Admin)?;

    request.code = request.code.trim().to_string();
    validate_required("Course code", &request.code).map_err(SimsError::validation)?;
    validate_required("Course name", &request.name).map_err(SimsError::validation)?;
    validate_credit_units(request.credit_units).map_err(SimsError::validation)?;

    let course = service.storage().create_course(request).await?;
    info!("Course {} created", course.code);
    Ok(course)
}

pub async fn update_course(
    service: &AdminService,
    identity: &Identity,
    id: i64,
    request: UpdateCourseRequest,
) -> Result<Course> {
    identity.require_role(Role::Admin)?;

    if let Some(code) = &request.code {
        validate_required("Course code", code).map_err(SimsError::validation)?;
    }
    if let Some(name) = &request.name {
        validate_required("Course name", name).map_err(SimsError::validation)?;
    }
    if let Some(units) = request.credit_units {
        validate_credit_units(units).map_err(SimsError::validation)?;
    }

    service
        .storage()
        .update_course(id, request)
        .await?
        .ok_or_else(|| SimsError::not_found("Course not found"))
}

/// 删除课程，仍有教学班时拒绝
pub async fn delete_course(service: &AdminService, identity: &Identity, id: i64) -> Result<()> {
    identity.require_role(Role::Admin)?;
    let storage = service.storage();

    if storage.get_course(id).await?.is_none() {
        return Err(SimsError::not_found("Course not found"));
    }
    let sections = storage.count_class_sections_of_course(id).await?;
    if sections > 0 {
        return Err(SimsError::validation(format!(
            "Course still has {sections} class section(s); delete them first"
        )));
    }

    storage.delete_course(id).await?;
    info!("Course {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{admin, admin_service};
    use super::*;

    #[tokio::test]
    async fn test_course_lifecycle() {
        let service = admin_service().await;
        let course = service
            .create_course(
                &admin(),
                CreateCourseRequest {
                    code: " OS201 ".to_string(),
                    name: "Operating Systems".to_string(),
                    credit_units: 3,
                },
            )
            .await
            .unwrap();
        assert_eq!(course.code, "OS201");

        let renamed = service
            .update_course(
                &admin(),
                course.id,
                UpdateCourseRequest {
                    name: Some("Operating Systems I".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Operating Systems I");

        service.delete_course(&admin(), course.id).await.unwrap();
        let err = service.delete_course(&admin(), course.id).await.unwrap_err();
        assert!(matches!(err, SimsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_credit_units_are_bounded() {
        let service = admin_service().await;
        let err = service
            .create_course(
                &admin(),
                CreateCourseRequest {
                    code: "BAD1".to_string(),
                    name: "Bad".to_string(),
                    credit_units: -2,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Validation(_)));
    }

    #[tokio::test]
    async fn test_course_in_use_is_refused() {
        let service = admin_service().await;
        let overview = service.course_overview(&admin()).await.unwrap();
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].sections[0].name, "Networks - Morning");

        let err = service
            .delete_course(&admin(), overview[0].course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Validation(_)));
        assert_eq!(service.list_courses(&admin()).await.unwrap().len(), 1);
    }
}
