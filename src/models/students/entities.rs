use serde::{Deserialize, Serialize};

// 学生记录（账号 + 学生档案）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub student_number: String,
    pub address: String,
    pub phone: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
