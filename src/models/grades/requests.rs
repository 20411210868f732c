use serde::Deserialize;

// 录入成绩请求
#[derive(Debug, Clone, Deserialize)]
pub struct SetGradeRequest {
    pub score: f64,
}
