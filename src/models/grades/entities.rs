use serde::{Deserialize, Serialize};

// 成绩，每条选课记录至多一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub enrollment_id: i64,
    pub score: f64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
