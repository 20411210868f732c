use serde::{Deserialize, Serialize};

// 上课时间段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: i64,
    pub class_section_id: i64,
    pub day: String,
    pub time_range: String,
}

// 课表列表条目（附带教学班名称）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlotListItem {
    #[serde(flatten)]
    pub slot: ScheduleSlot,
    pub class_section_name: String,
}
