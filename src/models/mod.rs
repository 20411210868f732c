pub mod accounts;
pub mod auth;
pub mod class_sections;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod grades;
pub mod instructors;
pub mod schedules;
pub mod seed;
pub mod students;

pub use common::{ApiResponse, ErrorCode, RedirectHint};

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
