//! 教师档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "instructor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub instructor_number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::Id",
        to = "super::accounts::Column::Id"
    )]
    Account,
    #[sea_orm(has_many = "super::class_sections::Entity")]
    ClassSections,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::class_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 与账号合并为业务层的教师记录
    pub fn into_instructor_record(
        self,
        account: super::accounts::Model,
    ) -> crate::models::instructors::entities::InstructorRecord {
        use crate::models::instructors::entities::InstructorRecord;
        use chrono::{DateTime, Utc};

        InstructorRecord {
            id: self.id,
            username: account.username,
            display_name: account.display_name,
            instructor_number: self.instructor_number,
            created_at: DateTime::<Utc>::from_timestamp(account.created_at, 0).unwrap_or_default(),
        }
    }
}
