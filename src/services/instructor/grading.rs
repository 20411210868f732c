use tracing::{info, warn};

use super::{InstructorService, classes::NOT_YOUR_SECTION};
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    enrollments::entities::{EnrolledStudent, EnrollmentOwnership, GradingDetail},
    grades::{entities::Grade, requests::SetGradeRequest},
};
use crate::utils::validate::validate_score;

/// 查找选课记录并确认调用者是该教学班的任课教师
///
/// 选课记录不存在返回 NotFound；教学班属于其他教师或没有任课教师时返回 Authorization，
/// 而不是静默过滤。
async fn owned_enrollment(
    service: &InstructorService,
    identity: &Identity,
    enrollment_id: i64,
) -> Result<EnrollmentOwnership> {
    let ownership = service
        .storage()
        .get_enrollment_ownership(enrollment_id)
        .await?
        .ok_or_else(|| SimsError::not_found("Enrollment not found"))?;

    if !ownership.is_taught_by(identity.account_id) {
        warn!(
            "Instructor {} denied access to enrollment {}",
            identity.account_id, enrollment_id
        );
        return Err(SimsError::authorization(NOT_YOUR_SECTION));
    }
    Ok(ownership)
}

pub async fn grading_detail(
    service: &InstructorService,
    identity: &Identity,
    enrollment_id: i64,
) -> Result<GradingDetail> {
    identity.require_role(Role::Instructor)?;
    let ownership = owned_enrollment(service, identity, enrollment_id).await?;
    let enrollment = ownership.enrollment;
    let storage = service.storage();

    let student = storage
        .get_student(enrollment.student_id)
        .await?
        .ok_or_else(|| SimsError::not_found("Student not found"))?;
    let class_section = storage
        .get_class_section_summary(enrollment.class_section_id)
        .await?
        .ok_or_else(|| SimsError::not_found("Class section not found"))?;
    let grade = storage.get_grade_by_enrollment(enrollment.id).await?;

    Ok(GradingDetail {
        enrollment_id: enrollment.id,
        student: EnrolledStudent {
            id: student.id,
            username: student.username,
            display_name: student.display_name,
            student_number: student.student_number,
        },
        class_section,
        grade,
    })
}

/// 录入成绩，已有成绩时原地更新
pub async fn set_grade(
    service: &InstructorService,
    identity: &Identity,
    enrollment_id: i64,
    request: SetGradeRequest,
) -> Result<Grade> {
    identity.require_role(Role::Instructor)?;
    owned_enrollment(service, identity, enrollment_id).await?;
    validate_score(request.score).map_err(SimsError::validation)?;

    let grade = service
        .storage()
        .upsert_grade(enrollment_id, request.score)
        .await?;
    info!(
        "Instructor {} graded enrollment {} with {}",
        identity.account_id, enrollment_id, grade.score
    );
    Ok(grade)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{instructor, instructor_service};
    use super::*;
    use crate::models::class_sections::requests::UpdateClassSectionRequest;
    use crate::models::instructors::requests::CreateInstructorRequest;

    async fn seeded_enrollment(service: &InstructorService) -> i64 {
        let section_id = service.list_own_classes(&instructor()).await.unwrap()[0].id;
        service
            .storage()
            .list_class_roster(section_id)
            .await
            .unwrap()[0]
            .enrollment_id
    }

    #[tokio::test]
    async fn test_grading_detail() {
        let service = instructor_service().await;
        let enrollment_id = seeded_enrollment(&service).await;

        let detail = service
            .grading_detail(&instructor(), enrollment_id)
            .await
            .unwrap();
        assert_eq!(detail.student.student_number, "20231001");
        assert_eq!(detail.class_section.course_code, "NET101");
        assert_eq!(detail.grade.map(|g| g.score), Some(85.0));
    }

    #[tokio::test]
    async fn test_regrade_visible_to_student_and_forbidden_to_others() {
        let service = instructor_service().await;
        let enrollment_id = seeded_enrollment(&service).await;

        let grade = service
            .set_grade(&instructor(), enrollment_id, SetGradeRequest { score: 90.0 })
            .await
            .unwrap();
        assert_eq!(grade.score, 90.0);

        let student = service
            .storage()
            .get_account_by_username("student1")
            .await
            .unwrap()
            .unwrap();
        let views = service
            .storage()
            .list_student_enrollments(student.id)
            .await
            .unwrap();
        assert_eq!(views[0].score, Some(90.0));

        let other = service
            .storage()
            .create_instructor(CreateInstructorRequest {
                username: "instructor2".to_string(),
                password: "digest".to_string(),
                display_name: "Dr. Two".to_string(),
                instructor_number: "NIDN22222".to_string(),
            })
            .await
            .unwrap();
        let other = Identity::new(other.id, Role::Instructor, "Dr. Two");
        let err = service
            .set_grade(&other, enrollment_id, SetGradeRequest { score: 10.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));

        // 越权写入不改变成绩
        let grade = service
            .storage()
            .get_grade_by_enrollment(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(grade.score, 90.0);
    }

    #[tokio::test]
    async fn test_unassigned_section_is_forbidden() {
        let service = instructor_service().await;
        let enrollment_id = seeded_enrollment(&service).await;
        let section_id = service.list_own_classes(&instructor()).await.unwrap()[0].id;
        service
            .storage()
            .update_class_section(
                section_id,
                UpdateClassSectionRequest {
                    clear_instructor: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service
            .set_grade(&instructor(), enrollment_id, SetGradeRequest { score: 70.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_missing_enrollment_and_bad_score() {
        let service = instructor_service().await;
        let err = service
            .set_grade(&instructor(), 999, SetGradeRequest { score: 70.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::NotFound(_)));

        let enrollment_id = seeded_enrollment(&service).await;
        for score in [-1.0, 100.5, f64::NAN] {
            let err = service
                .set_grade(&instructor(), enrollment_id, SetGradeRequest { score })
                .await
                .unwrap_err();
            assert!(matches!(err, SimsError::Validation(_)));
        }
    }
}
