use tracing::info;

use super::AdminService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    class_sections::{
        entities::{ClassSection, ClassSectionDetail, ClassSectionSummary},
        requests::{CreateClassSectionRequest, UpdateClassSectionRequest},
    },
};
use crate::utils::validate::validate_required;

pub async fn list_class_sections(
    service: &AdminService,
    identity: &Identity,
) -> Result<Vec<ClassSectionSummary>> {
    identity.require_role(Role::Admin)?;
    service.storage().list_class_sections().await
}

/// 教学班详情：概要、课表与名单
pub async fn class_section_detail(
    service: &AdminService,
    identity: &Identity,
    id: i64,
) -> Result<ClassSectionDetail> {
    identity.require_role(Role::Admin)?;
    let storage = service.storage();

    let section = storage
        .get_class_section_summary(id)
        .await?
        .ok_or_else(|| SimsError::not_found("Class section not found"))?;
    let schedule = storage.list_schedule_slots_by_class_section(id).await?;
    let roster = storage.list_class_roster(id).await?;

    Ok(ClassSectionDetail {
        section,
        schedule,
        roster,
    })
}

/// 请求体中引用的课程与教师必须存在
async fn check_references(
    service: &AdminService,
    course_id: Option<i64>,
    instructor_id: Option<i64>,
) -> Result<()> {
    let storage = service.storage();
    if let Some(course_id) = course_id
        && storage.get_course(course_id).await?.is_none()
    {
        return Err(SimsError::validation(format!(
            "Course {course_id} does not exist"
        )));
    }
    if let Some(instructor_id) = instructor_id
        && storage.get_instructor(instructor_id).await?.is_none()
    {
        return Err(SimsError::validation(format!(
            "Instructor {instructor_id} does not exist"
        )));
    }
    Ok(())
}

pub async fn create_class_section(
    service: &AdminService,
    identity: &Identity,
    request: CreateClassSectionRequest,
) -> Result<ClassSection> {
    identity.require_role(Role::Admin)?;

    validate_required("Class section name", &request.name).map_err(SimsError::validation)?;
    check_references(service, Some(request.course_id), request.instructor_id).await?;

    let section = service.storage().create_class_section(request).await?;
    info!("Class section {} ({}) created", section.id, section.name);
    Ok(section)
}

pub async fn update_class_section(
    service: &AdminService,
    identity: &Identity,
    id: i64,
    request: UpdateClassSectionRequest,
) -> Result<ClassSection> {
    identity.require_role(Role::Admin)?;

    if let Some(name) = &request.name {
        validate_required("Class section name", name).map_err(SimsError::validation)?;
    }
    if request.clear_instructor && request.instructor_id.is_some() {
        return Err(SimsError::validation(
            "Cannot assign and clear the instructor at the same time",
        ));
    }
    check_references(service, request.course_id, request.instructor_id).await?;

    service
        .storage()
        .update_class_section(id, request)
        .await?
        .ok_or_else(|| SimsError::not_found("Class section not found"))
}

/// 删除教学班及其课表、选课与成绩
pub async fn delete_class_section(
    service: &AdminService,
    identity: &Identity,
    id: i64,
) -> Result<()> {
    identity.require_role(Role::Admin)?;

    if service.storage().delete_class_section(id).await? {
        info!("Class section {} deleted with its schedule and enrollments", id);
        Ok(())
    } else {
        Err(SimsError::not_found("Class section not found"))
    }
}
