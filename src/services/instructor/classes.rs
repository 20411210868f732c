use tracing::warn;

use super::InstructorService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    class_sections::entities::{ClassSectionDetail, ClassSectionSummary},
};

pub(super) const NOT_YOUR_SECTION: &str = "Access denied: not your class section";

pub async fn list_own_classes(
    service: &InstructorService,
    identity: &Identity,
) -> Result<Vec<ClassSectionSummary>> {
    identity.require_role(Role::Instructor)?;
    service
        .storage()
        .list_class_sections_by_instructor(identity.account_id)
        .await
}

/// 教学班名单，只对任课教师可见
pub async fn class_roster(
    service: &InstructorService,
    identity: &Identity,
    class_section_id: i64,
) -> Result<ClassSectionDetail> {
    identity.require_role(Role::Instructor)?;
    let storage = service.storage();

    let section = storage
        .get_class_section_summary(class_section_id)
        .await?
        .ok_or_else(|| SimsError::not_found("Class section not found"))?;
    if section.instructor_id != Some(identity.account_id) {
        warn!(
            "Instructor {} tried to open class section {}",
            identity.account_id, class_section_id
        );
        return Err(SimsError::authorization(NOT_YOUR_SECTION));
    }

    let schedule = storage
        .list_schedule_slots_by_class_section(class_section_id)
        .await?;
    let roster = storage.list_class_roster(class_section_id).await?;

    Ok(ClassSectionDetail {
        section,
        schedule,
        roster,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{instructor, instructor_service};
    use super::*;
    use crate::models::instructors::requests::CreateInstructorRequest;

    #[tokio::test]
    async fn test_lists_only_own_classes() {
        let service = instructor_service().await;
        let classes = service.list_own_classes(&instructor()).await.unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].course_name, "Computer Networks");

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
        assert!(service.list_own_classes(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roster_ownership() {
        let service = instructor_service().await;
        let section_id = service.list_own_classes(&instructor()).await.unwrap()[0].id;

        let detail = service.class_roster(&instructor(), section_id).await.unwrap();
        assert_eq!(detail.roster.len(), 1);
        assert_eq!(detail.roster[0].username, "student1");
        assert_eq!(detail.roster[0].score, Some(85.0));

        let stranger = Identity::new(42, Role::Instructor, "Dr. Nobody");
        let err = service.class_roster(&stranger, section_id).await.unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));

        let err = service.class_roster(&instructor(), 999).await.unwrap_err();
        assert!(matches!(err, SimsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_student_cannot_use_instructor_scope() {
        let service = instructor_service().await;
        let student = Identity::new(3, Role::Student, "Budi Student");
        let err = service.list_own_classes(&student).await.unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));
    }
}
