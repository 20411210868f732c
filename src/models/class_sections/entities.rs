use serde::{Deserialize, Serialize};

use crate::models::enrollments::entities::RosterEntry;
use crate::models::schedules::entities::ScheduleSlot;

// 教学班
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSection {
    pub id: i64,
    pub name: String,
    pub course_id: i64,
    pub instructor_id: Option<i64>,
}

// 教学班概要（附带课程名与教师名）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSectionSummary {
    pub id: i64,
    pub name: String,
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub instructor_id: Option<i64>,
    pub instructor_name: Option<String>,
}

// 教学班详情：概要、课表与学生名单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSectionDetail {
    pub section: ClassSectionSummary,
    pub schedule: Vec<ScheduleSlot>,
    pub roster: Vec<RosterEntry>,
}
