pub mod classes;
pub mod grading;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    auth::Identity,
    class_sections::entities::{ClassSectionDetail, ClassSectionSummary},
    enrollments::entities::GradingDetail,
    grades::{entities::Grade, requests::SetGradeRequest},
};
use crate::storage::Storage;

/// 教师业务：只能访问自己任教的教学班
pub struct InstructorService {
    storage: Arc<dyn Storage>,
}

impl InstructorService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    // 自己任教的教学班
    pub async fn list_own_classes(&self, identity: &Identity) -> Result<Vec<ClassSectionSummary>> {
        classes::list_own_classes(self, identity).await
    }

    // 教学班名单
    pub async fn class_roster(
        &self,
        identity: &Identity,
        class_section_id: i64,
    ) -> Result<ClassSectionDetail> {
        classes::class_roster(self, identity, class_section_id).await
    }

    // 评分页面数据
    pub async fn grading_detail(
        &self,
        identity: &Identity,
        enrollment_id: i64,
    ) -> Result<GradingDetail> {
        grading::grading_detail(self, identity, enrollment_id).await
    }

    // 录入或修改成绩
    pub async fn set_grade(
        &self,
        identity: &Identity,
        enrollment_id: i64,
        request: SetGradeRequest,
    ) -> Result<Grade> {
        grading::set_grade(self, identity, enrollment_id, request).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::InstructorService;
    use crate::models::{accounts::entities::Role, auth::Identity};
    use crate::runtime::lifetime::startup::test_support::seeded_storage;

    /// 演示数据中的 instructor1
    pub(crate) fn instructor() -> Identity {
        Identity::new(2, Role::Instructor, "Dr. Instructor One")
    }

    pub(crate) async fn instructor_service() -> InstructorService {
        InstructorService::new(seeded_storage().await)
    }
}
