//! 课表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_section_id: i64,
    pub day: String,
    pub time_range: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_sections::Entity",
        from = "Column::ClassSectionId",
        to = "super::class_sections::Column::Id"
    )]
    ClassSection,
}

impl Related<super::class_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule_slot(self) -> crate::models::schedules::entities::ScheduleSlot {
        crate::models::schedules::entities::ScheduleSlot {
            id: self.id,
            class_section_id: self.class_section_id,
            day: self.day,
            time_range: self.time_range,
        }
    }
}
