use crate::models::{
    accounts::entities::NewAccount, courses::requests::CreateCourseRequest,
    instructors::requests::CreateInstructorRequest, students::requests::CreateStudentRequest,
};

/// 首次启动写入的演示数据，密码已哈希
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub admin: NewAccount,
    pub instructor: CreateInstructorRequest,
    pub student: CreateStudentRequest,
    pub course: CreateCourseRequest,
    pub section_name: String,
    pub schedule_day: String,
    pub schedule_time_range: String,
    pub score: f64,
}

/// 演示数据写入后的账号 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededAccounts {
    pub admin_id: i64,
    pub instructor_id: i64,
    pub student_id: i64,
}
