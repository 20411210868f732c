pub mod class_sections;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod instructors;
pub mod schedules;
pub mod students;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    auth::Identity,
    class_sections::{
        entities::{ClassSection, ClassSectionDetail, ClassSectionSummary},
        requests::{CreateClassSectionRequest, UpdateClassSectionRequest},
    },
    courses::{
        entities::{Course, CourseOverview},
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    dashboard::responses::AdminOverview,
    enrollments::{entities::Enrollment, requests::EnrollRequest},
    instructors::{
        entities::InstructorRecord,
        requests::{CreateInstructorRequest, UpdateInstructorRequest},
    },
    schedules::{
        entities::{ScheduleSlot, ScheduleSlotListItem},
        requests::CreateScheduleSlotRequest,
    },
    students::{
        entities::StudentRecord,
        requests::{CreateStudentRequest, UpdateStudentRequest},
    },
};
use crate::storage::Storage;

/// 管理员业务：所有实体的完整读写
pub struct AdminService {
    storage: Arc<dyn Storage>,
}

impl AdminService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    // 首页统计
    pub async fn dashboard(&self, identity: &Identity) -> Result<AdminOverview> {
        dashboard::overview(self, identity).await
    }

    // 学生
    pub async fn list_students(&self, identity: &Identity) -> Result<Vec<StudentRecord>> {
        students::list_students(self, identity).await
    }

    pub async fn get_student(&self, identity: &Identity, id: i64) -> Result<StudentRecord> {
        students::get_student(self, identity, id).await
    }

    pub async fn create_student(
        &self,
        identity: &Identity,
        request: CreateStudentRequest,
    ) -> Result<StudentRecord> {
        students::create_student(self, identity, request).await
    }

    pub async fn update_student(
        &self,
        identity: &Identity,
        id: i64,
        request: UpdateStudentRequest,
    ) -> Result<StudentRecord> {
        students::update_student(self, identity, id, request).await
    }

    pub async fn delete_student(&self, identity: &Identity, id: i64) -> Result<()> {
        students::delete_student(self, identity, id).await
    }

    // 教师
    pub async fn list_instructors(&self, identity: &Identity) -> Result<Vec<InstructorRecord>> {
        instructors::list_instructors(self, identity).await
    }

    pub async fn get_instructor(&self, identity: &Identity, id: i64) -> Result<InstructorRecord> {
        instructors::get_instructor(self, identity, id).await
    }

    pub async fn create_instructor(
        &self,
        identity: &Identity,
        request: CreateInstructorRequest,
    ) -> Result<InstructorRecord> {
        instructors::create_instructor(self, identity, request).await
    }

    pub async fn update_instructor(
        &self,
        identity: &Identity,
        id: i64,
        request: UpdateInstructorRequest,
    ) -> Result<InstructorRecord> {
        instructors::update_instructor(self, identity, id, request).await
    }

    pub async fn delete_instructor(&self, identity: &Identity, id: i64) -> Result<()> {
        instructors::delete_instructor(self, identity, id).await
    }

    // 课程
    pub async fn list_courses(&self, identity: &Identity) -> Result<Vec<Course>> {
        courses::list_courses(self, identity).await
    }

    pub async fn course_overview(&self, identity: &Identity) -> Result<Vec<CourseOverview>> {
        courses::course_overview(self, identity).await
    }

    pub async fn create_course(
        &self,
        identity: &Identity,
        request: CreateCourseRequest,
    ) -> Result<Course> {
        courses::create_course(self, identity, request).await
    }

    pub async fn update_course(
        &self,
        identity: &Identity,
        id: i64,
        request: UpdateCourseRequest,
    ) -> Result<Course> {
        courses::update_course(self, identity, id, request).await
    }

    pub async fn delete_course(&self, identity: &Identity, id: i64) -> Result<()> {
        courses::delete_course(self, identity, id).await
    }

    // 教学班
    pub async fn list_class_sections(
        &self,
        identity: &Identity,
    ) -> Result<Vec<ClassSectionSummary>> {
        class_sections::list_class_sections(self, identity).await
    }

    pub async fn class_section_detail(
        &self,
        identity: &Identity,
        id: i64,
    ) -> Result<ClassSectionDetail> {
        class_sections::class_section_detail(self, identity, id).await
    }

    pub async fn create_class_section(
        &self,
        identity: &Identity,
        request: CreateClassSectionRequest,
    ) -> Result<ClassSection> {
        class_sections::create_class_section(self, identity, request).await
    }

    pub async fn update_class_section(
        &self,
        identity: &Identity,
        id: i64,
        request: UpdateClassSectionRequest,
    ) -> Result<ClassSection> {
        class_sections::update_class_section(self, identity, id, request).await
    }

    pub async fn delete_class_section(&self, identity: &Identity, id: i64) -> Result<()> {
        class_sections::delete_class_section(self, identity, id).await
    }

    // 课表
    pub async fn list_schedule_slots(
        &self,
        identity: &Identity,
    ) -> Result<Vec<ScheduleSlotListItem>> {
        schedules::list_schedule_slots(self, identity).await
    }

    pub async fn create_schedule_slot(
        &self,
        identity: &Identity,
        request: CreateScheduleSlotRequest,
    ) -> Result<ScheduleSlot> {
        schedules::create_schedule_slot(self, identity, request).await
    }

    pub async fn delete_schedule_slot(&self, identity: &Identity, id: i64) -> Result<()> {
        schedules::delete_schedule_slot(self, identity, id).await
    }

    // 选课
    pub async fn enroll(
        &self,
        identity: &Identity,
        class_section_id: i64,
        request: EnrollRequest,
    ) -> Result<Enrollment> {
        enrollments::enroll(self, identity, class_section_id, request).await
    }

    pub async fn unenroll(
        &self,
        identity: &Identity,
        class_section_id: i64,
        enrollment_id: i64,
    ) -> Result<()> {
        enrollments::unenroll(self, identity, class_section_id, enrollment_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::AdminService;
    use crate::models::{accounts::entities::Role, auth::Identity};
    use crate::runtime::lifetime::startup::test_support::seeded_storage;

    pub(crate) fn admin() -> Identity {
        Identity::new(1, Role::Admin, "Administrator")
    }

    pub(crate) async fn admin_service() -> AdminService {
        AdminService::new(seeded_storage().await)
    }
}
