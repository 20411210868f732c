//! 成绩存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{Result, SimsError};
use crate::models::grades::entities::Grade;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入成绩：已有则原地更新，否则插入，保证每条选课记录至多一条成绩
    pub async fn upsert_grade_impl(&self, enrollment_id: i64, score: f64) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Grades::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询成绩失败: {e}")))?;

        let saved = match existing {
            Some(grade) => ActiveModel {
                id: Unchanged(grade.id),
                score: Set(score),
                graded_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("更新成绩失败: {e}")))?,
            None => ActiveModel {
                enrollment_id: Set(enrollment_id),
                score: Set(score),
                graded_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| write_error("写入成绩失败", "Grade already exists", e))?,
        };

        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_grade())
    }

    pub async fn get_grade_by_enrollment_impl(&self, enrollment_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }
}
