use serde::{Deserialize, Serialize};

// 教师记录（账号 + 教师档案）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorRecord {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub instructor_number: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
