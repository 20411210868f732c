use serde::{Deserialize, Serialize};

use crate::models::class_sections::entities::ClassSectionSummary;
use crate::models::grades::entities::Grade;
use crate::models::schedules::entities::ScheduleSlot;

// 选课记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub class_section_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

/// 选课记录及其所属教学班的任课教师，用于归属校验
#[derive(Debug, Clone)]
pub struct EnrollmentOwnership {
    pub enrollment: Enrollment,
    pub instructor_id: Option<i64>,
}

impl EnrollmentOwnership {
    /// 该选课记录是否属于指定教师任教的教学班
    pub fn is_taught_by(&self, instructor_id: i64) -> bool {
        self.instructor_id == Some(instructor_id)
    }
}

// 教学班名单条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub username: String,
    pub display_name: String,
    pub student_number: String,
    pub score: Option<f64>,
}

// 选课记录中的学生信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledStudent {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub student_number: String,
}

// 教师评分页所需的选课详情
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingDetail {
    pub enrollment_id: i64,
    pub student: EnrolledStudent,
    pub class_section: ClassSectionSummary,
    pub grade: Option<Grade>,
}

// 学生视角下的一门已选课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentEnrollmentView {
    pub enrollment_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credit_units: i32,
    pub class_section_id: i64,
    pub class_section_name: String,
    pub instructor_name: Option<String>,
    pub schedule: Vec<ScheduleSlot>,
    pub score: Option<f64>,
}
