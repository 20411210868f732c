use std::sync::Arc;

use crate::models::{
    accounts::entities::{Account, NewAccount, Role},
    class_sections::{
        entities::{ClassSection, ClassSectionSummary},
        requests::{CreateClassSectionRequest, UpdateClassSectionRequest},
    },
    courses::{
        entities::{Course, CourseOverview},
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::entities::{
        Enrollment, EnrollmentOwnership, RosterEntry, StudentEnrollmentView,
    },
    grades::entities::Grade,
    instructors::{
        entities::InstructorRecord,
        requests::{CreateInstructorRequest, UpdateInstructorRequest},
    },
    schedules::{
        entities::{ScheduleSlot, ScheduleSlotListItem},
        requests::CreateScheduleSlotRequest,
    },
    seed::entities::{DemoSeed, SeededAccounts},
    students::{
        entities::StudentRecord,
        requests::{CreateStudentRequest, UpdateStudentRequest},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储层接口
///
/// 单条查询返回 `Option`（零或一条），列表查询返回 `Vec`，调用方必须显式处理“不存在”。
/// 所有删除类的级联操作都在单个事务内完成。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号
    // 创建不带档案的账号（管理员）
    async fn create_account(&self, account: NewAccount, role: Role) -> Result<Account>;
    // 通过ID获取账号
    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>>;
    // 通过用户名获取账号
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计账号数量
    async fn count_accounts(&self) -> Result<u64>;

    /// 学生（账号 + 学生档案）
    // 创建学生，password 字段须为摘要
    async fn create_student(&self, student: CreateStudentRequest) -> Result<StudentRecord>;
    async fn get_student(&self, id: i64) -> Result<Option<StudentRecord>>;
    async fn list_students(&self) -> Result<Vec<StudentRecord>>;
    // 更新学生，password 字段（如有）须为摘要
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentRecord>>;
    // 级联删除：成绩 -> 选课 -> 学生档案 -> 账号
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_students(&self) -> Result<u64>;

    /// 教师（账号 + 教师档案）
    async fn create_instructor(
        &self,
        instructor: CreateInstructorRequest,
    ) -> Result<InstructorRecord>;
    async fn get_instructor(&self, id: i64) -> Result<Option<InstructorRecord>>;
    async fn list_instructors(&self) -> Result<Vec<InstructorRecord>>;
    async fn update_instructor(
        &self,
        id: i64,
        update: UpdateInstructorRequest,
    ) -> Result<Option<InstructorRecord>>;
    // 级联删除：解除任课关系 -> 教师档案 -> 账号
    async fn delete_instructor(&self, id: i64) -> Result<bool>;
    async fn count_instructors(&self) -> Result<u64>;

    /// 课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses(&self) -> Result<Vec<Course>>;
    // 课程及其下所有教学班和任课教师
    async fn list_course_overview(&self) -> Result<Vec<CourseOverview>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;
    async fn count_courses(&self) -> Result<u64>;
    async fn count_class_sections_of_course(&self, course_id: i64) -> Result<u64>;

    /// 教学班
    async fn create_class_section(
        &self,
        section: CreateClassSectionRequest,
    ) -> Result<ClassSection>;
    async fn get_class_section(&self, id: i64) -> Result<Option<ClassSection>>;
    async fn get_class_section_summary(&self, id: i64) -> Result<Option<ClassSectionSummary>>;
    async fn list_class_sections(&self) -> Result<Vec<ClassSectionSummary>>;
    // 指定教师任教的教学班
    async fn list_class_sections_by_instructor(
        &self,
        instructor_id: i64,
    ) -> Result<Vec<ClassSectionSummary>>;
    async fn update_class_section(
        &self,
        id: i64,
        update: UpdateClassSectionRequest,
    ) -> Result<Option<ClassSection>>;
    // 级联删除：成绩 -> 选课 -> 课表 -> 教学班
    async fn delete_class_section(&self, id: i64) -> Result<bool>;
    async fn count_class_sections(&self) -> Result<u64>;

    /// 课表
    async fn create_schedule_slot(&self, slot: CreateScheduleSlotRequest) -> Result<ScheduleSlot>;
    async fn list_schedule_slots(&self) -> Result<Vec<ScheduleSlotListItem>>;
    async fn list_schedule_slots_by_class_section(
        &self,
        class_section_id: i64,
    ) -> Result<Vec<ScheduleSlot>>;
    async fn delete_schedule_slot(&self, id: i64) -> Result<bool>;

    /// 选课
    async fn enroll_student(&self, student_id: i64, class_section_id: i64) -> Result<Enrollment>;
    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>>;
    // 选课记录及所属教学班的任课教师
    async fn get_enrollment_ownership(&self, id: i64) -> Result<Option<EnrollmentOwnership>>;
    async fn list_class_roster(&self, class_section_id: i64) -> Result<Vec<RosterEntry>>;
    async fn list_student_enrollments(&self, student_id: i64)
    -> Result<Vec<StudentEnrollmentView>>;
    // 级联删除：成绩 -> 选课记录（限定在指定教学班内）
    async fn unenroll(&self, class_section_id: i64, enrollment_id: i64) -> Result<bool>;

    /// 成绩
    // 已有成绩则原地更新，否则插入
    async fn upsert_grade(&self, enrollment_id: i64, score: f64) -> Result<Grade>;
    async fn get_grade_by_enrollment(&self, enrollment_id: i64) -> Result<Option<Grade>>;

    /// 演示数据
    // 库中没有账号时在单个事务内写入全部演示记录，已有账号返回 None
    async fn seed_demo_data(&self, seed: DemoSeed) -> Result<Option<SeededAccounts>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
