use serde::Deserialize;

// 创建教师请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstructorRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub instructor_number: String,
}

// 更新教师请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstructorRequest {
    pub display_name: Option<String>,
    pub instructor_number: Option<String>,
    pub password: Option<String>,
}
