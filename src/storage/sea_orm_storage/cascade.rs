//! 级联删除
//!
//! 每个删除操作都在单个事务中按依赖顺序删除下游记录，任一步失败则整体回滚。
//! 删除顺序：成绩 -> 选课 -> 课表 -> 教学班 / 档案 -> 账号。

use super::SeaOrmStorage;
use crate::entity::accounts::Entity as Accounts;
use crate::entity::class_sections::{Column as SectionColumn, Entity as ClassSections};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::instructor_profiles::Entity as InstructorProfiles;
use crate::entity::schedule_slots::{Column as SlotColumn, Entity as ScheduleSlots};
use crate::entity::student_profiles::Entity as StudentProfiles;
use crate::errors::{Result, SimsError};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use tracing::debug;

fn delete_error(step: &str, e: sea_orm::DbErr) -> SimsError {
    SimsError::database_operation(format!("{step}失败: {e}"))
}

impl SeaOrmStorage {
    async fn begin_cascade(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))
    }

    async fn commit_cascade(txn: DatabaseTransaction) -> Result<()> {
        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))
    }

    /// 删除若干选课记录的成绩
    async fn delete_grades_of(txn: &DatabaseTransaction, enrollment_ids: Vec<i64>) -> Result<u64> {
        if enrollment_ids.is_empty() {
            return Ok(0);
        }
        let result = Grades::delete_many()
            .filter(GradeColumn::EnrollmentId.is_in(enrollment_ids))
            .exec(txn)
            .await
            .map_err(|e| delete_error("删除成绩", e))?;
        Ok(result.rows_affected)
    }

    async fn enrollment_ids_where(
        txn: &DatabaseTransaction,
        column: EnrollmentColumn,
        value: i64,
    ) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::Id)
            .filter(column.eq(value))
            .into_tuple::<i64>()
            .all(txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询选课记录失败: {e}")))
    }

    /// 删除学生：成绩 -> 选课 -> 学生档案 -> 账号
    pub async fn delete_student_cascade(&self, student_id: i64) -> Result<bool> {
        let txn = self.begin_cascade().await?;

        let exists = StudentProfiles::find_by_id(student_id)
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let enrollment_ids =
            Self::enrollment_ids_where(&txn, EnrollmentColumn::StudentId, student_id).await?;
        let grades = Self::delete_grades_of(&txn, enrollment_ids).await?;

        let enrollments = Enrollments::delete_many()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除选课记录", e))?
            .rows_affected;

        StudentProfiles::delete_by_id(student_id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除学生档案", e))?;
        Accounts::delete_by_id(student_id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除学生账号", e))?;

        Self::commit_cascade(txn).await?;
        debug!(
            "Deleted student {} with {} enrollments and {} grades",
            student_id, enrollments, grades
        );
        Ok(true)
    }

    /// 删除教师：解除其任教的教学班 -> 教师档案 -> 账号
    pub async fn delete_instructor_cascade(&self, instructor_id: i64) -> Result<bool> {
        let txn = self.begin_cascade().await?;

        let exists = InstructorProfiles::find_by_id(instructor_id)
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教师失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let detached = ClassSections::update_many()
            .col_expr(SectionColumn::InstructorId, Expr::value(Option::<i64>::None))
            .filter(SectionColumn::InstructorId.eq(instructor_id))
            .exec(&txn)
            .await
            .map_err(|e| delete_error("解除任课关系", e))?
            .rows_affected;

        InstructorProfiles::delete_by_id(instructor_id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除教师档案", e))?;
        Accounts::delete_by_id(instructor_id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除教师账号", e))?;

        Self::commit_cascade(txn).await?;
        debug!(
            "Deleted instructor {}, {} class sections left without instructor",
            instructor_id, detached
        );
        Ok(true)
    }

    /// 删除教学班：成绩 -> 选课 -> 课表 -> 教学班
    pub async fn delete_class_section_cascade(&self, class_section_id: i64) -> Result<bool> {
        let txn = self.begin_cascade().await?;

        let exists = ClassSections::find_by_id(class_section_id)
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let enrollment_ids = Self::enrollment_ids_where(
            &txn,
            EnrollmentColumn::ClassSectionId,
            class_section_id,
        )
        .await?;
        Self::delete_grades_of(&txn, enrollment_ids).await?;

        Enrollments::delete_many()
            .filter(EnrollmentColumn::ClassSectionId.eq(class_section_id))
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除选课记录", e))?;
        ScheduleSlots::delete_many()
            .filter(SlotColumn::ClassSectionId.eq(class_section_id))
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除课表", e))?;
        ClassSections::delete_by_id(class_section_id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除教学班", e))?;

        Self::commit_cascade(txn).await?;
        Ok(true)
    }

    /// 退课：成绩 -> 选课记录，选课记录必须属于指定教学班
    pub async fn unenroll_cascade(&self, class_section_id: i64, enrollment_id: i64) -> Result<bool> {
        let txn = self.begin_cascade().await?;

        let exists = Enrollments::find_by_id(enrollment_id)
            .filter(EnrollmentColumn::ClassSectionId.eq(class_section_id))
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询选课记录失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        Self::delete_grades_of(&txn, vec![enrollment_id]).await?;
        Enrollments::delete_by_id(enrollment_id)
            .exec(&txn)
            .await
            .map_err(|e| delete_error("删除选课记录", e))?;

        Self::commit_cascade(txn).await?;
        Ok(true)
    }
}
