use std::sync::Arc;

use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    dashboard::responses::StudentDashboard,
    enrollments::entities::StudentEnrollmentView,
    students::entities::StudentRecord,
};
use crate::storage::Storage;

/// 学生业务：只读访问自己的档案与选课
pub struct StudentService {
    storage: Arc<dyn Storage>,
}

impl StudentService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn profile(&self, identity: &Identity) -> Result<StudentRecord> {
        identity.require_role(Role::Student)?;
        self.storage
            .get_student(identity.account_id)
            .await?
            .ok_or_else(|| SimsError::not_found("Student profile not found"))
    }

    // 已选课程，含任课教师、课表与成绩
    pub async fn enrollments(&self, identity: &Identity) -> Result<Vec<StudentEnrollmentView>> {
        identity.require_role(Role::Student)?;
        self.storage
            .list_student_enrollments(identity.account_id)
            .await
    }

    pub async fn dashboard(&self, identity: &Identity) -> Result<StudentDashboard> {
        let profile = self.profile(identity).await?;
        let enrollments = self.enrollments(identity).await?;
        Ok(StudentDashboard {
            profile,
            enrollments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::lifetime::startup::test_support::seeded_storage;

    fn student() -> Identity {
        Identity::new(3, Role::Student, "Budi Student")
    }

    #[tokio::test]
    async fn test_dashboard_shows_own_records() {
        let service = StudentService::new(seeded_storage().await);
        let dashboard = service.dashboard(&student()).await.unwrap();

        assert_eq!(dashboard.profile.student_number, "20231001");
        assert_eq!(dashboard.profile.address, "Jl. Merdeka 1");
        assert_eq!(dashboard.enrollments.len(), 1);

        let view = &dashboard.enrollments[0];
        assert_eq!(view.course_name, "Computer Networks");
        assert_eq!(view.credit_units, 3);
        assert_eq!(view.class_section_name, "Networks - Morning");
        assert_eq!(view.schedule.len(), 1);
        assert_eq!(view.schedule[0].time_range, "08:00-10:00");
        assert_eq!(view.score, Some(85.0));
    }

    #[tokio::test]
    async fn test_other_roles_are_forbidden() {
        let service = StudentService::new(seeded_storage().await);
        let instructor = Identity::new(2, Role::Instructor, "Dr. Instructor One");

        let err = service.profile(&instructor).await.unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));
        let err = service.enrollments(&instructor).await.unwrap_err();
        assert!(matches!(err, SimsError::Authorization(_)));
    }
}
