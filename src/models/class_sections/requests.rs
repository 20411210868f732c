use serde::Deserialize;

// 创建教学班请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassSectionRequest {
    pub name: String,
    pub course_id: i64,
    pub instructor_id: Option<i64>,
}

// 更新教学班请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassSectionRequest {
    pub name: Option<String>,
    pub course_id: Option<i64>,
    pub instructor_id: Option<i64>,
    /// 为 true 时移除任课教师（优先于 instructor_id）
    #[serde(default)]
    pub clear_instructor: bool,
}
