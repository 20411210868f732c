use serde::Deserialize;

// 创建学生请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub student_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

// 更新学生请求，角色与用户名不可修改
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub display_name: Option<String>,
    pub student_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}
