use serde::{Deserialize, Serialize};

// 课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credit_units: i32,
}

// 课程总览中的教学班条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSectionBrief {
    pub id: i64,
    pub name: String,
    pub instructor_name: Option<String>,
}

// 课程总览：课程及其下所有教学班
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOverview {
    pub course: Course,
    pub sections: Vec<CourseSectionBrief>,
}
