use serde::Deserialize;

// 选课请求
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub student_id: i64,
}
