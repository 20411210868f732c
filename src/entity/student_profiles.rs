//! 学生档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub student_number: String,
    pub address: String,
    pub phone: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::Id",
        to = "super::accounts::Column::Id"
    )]
    Account,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 与账号合并为业务层的学生记录
    pub fn into_student_record(
        self,
        account: super::accounts::Model,
    ) -> crate::models::students::entities::StudentRecord {
        use crate::models::students::entities::StudentRecord;
        use chrono::{DateTime, Utc};

        StudentRecord {
            id: self.id,
            username: account.username,
            display_name: account.display_name,
            student_number: self.student_number,
            address: self.address,
            phone: self.phone,
            created_at: DateTime::<Utc>::from_timestamp(account.created_at, 0).unwrap_or_default(),
        }
    }
}
