use tracing::info;

use super::AdminService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    enrollments::{entities::Enrollment, requests::EnrollRequest},
};

/// 将学生加入教学班
pub async fn enroll(
    service: &AdminService,
    identity: &Identity,
    class_section_id: i64,
    request: EnrollRequest,
) -> Result<Enrollment> {
    identity.require_role(Role::Admin)?;
    let storage = service.storage();

    if storage.get_class_section(class_section_id).await?.is_none() {
        return Err(SimsError::not_found("Class section not found"));
    }
    if storage.get_student(request.student_id).await?.is_none() {
        return Err(SimsError::validation(format!(
            "Student {} does not exist",
            request.student_id
        )));
    }

    // 重复选课由唯一索引拒绝
    let enrollment = storage
        .enroll_student(request.student_id, class_section_id)
        .await?;
    info!(
        "Student {} enrolled in class section {}",
        enrollment.student_id, class_section_id
    );
    Ok(enrollment)
}

/// 退课，连同成绩一起删除
pub async fn unenroll(
    service: &AdminService,
    identity: &Identity,
    class_section_id: i64,
    enrollment_id: i64,
) -> Result<()> {
    identity.require_role(Role::Admin)?;

    if service
        .storage()
        .unenroll(class_section_id, enrollment_id)
        .await?
    {
        info!(
            "Enrollment {} removed from class section {}",
            enrollment_id, class_section_id
        );
        Ok(())
    } else {
        Err(SimsError::not_found("Enrollment not found in this class section"))
    }
}
