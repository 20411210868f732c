//! 教学班实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub course_id: i64,
    pub instructor_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::instructor_profiles::Entity",
        from = "Column::InstructorId",
        to = "super::instructor_profiles::Column::Id",
        on_delete = "SetNull"
    )]
    Instructor,
    #[sea_orm(has_many = "super::schedule_slots::Entity")]
    ScheduleSlots,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::instructor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::schedule_slots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleSlots.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class_section(self) -> crate::models::class_sections::entities::ClassSection {
        crate::models::class_sections::entities::ClassSection {
            id: self.id,
            name: self.name,
            course_id: self.course_id,
            instructor_id: self.instructor_id,
        }
    }
}
