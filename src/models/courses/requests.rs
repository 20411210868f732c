use serde::Deserialize;

// 创建课程请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub credit_units: i32,
}

// 更新课程请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credit_units: Option<i32>,
}
