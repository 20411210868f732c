use serde::Serialize;

use crate::models::enrollments::entities::StudentEnrollmentView;
use crate::models::students::entities::StudentRecord;

// 管理员首页统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub students: u64,
    pub instructors: u64,
    pub courses: u64,
    pub class_sections: u64,
}

// 学生首页：个人信息与选课情况
#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub profile: StudentRecord,
    pub enrollments: Vec<StudentEnrollmentView>,
}
