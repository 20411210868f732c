use serde::Deserialize;

// 创建课表请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleSlotRequest {
    pub class_section_id: i64,
    pub day: String,
    pub time_range: String,
}
