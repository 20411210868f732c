//! 教师存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::accounts::{
    ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as Accounts,
};
use crate::entity::instructor_profiles::{ActiveModel, Column, Entity as InstructorProfiles};
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    instructors::{
        entities::InstructorRecord,
        requests::{CreateInstructorRequest, UpdateInstructorRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建教师（账号与档案在同一事务中写入）
    pub async fn create_instructor_impl(
        &self,
        req: CreateInstructorRequest,
    ) -> Result<InstructorRecord> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))?;

        let account = AccountActiveModel {
            username: Set(req.username),
            password_hash: Set(req.password),
            role: Set(Role::Instructor.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建教师账号失败", "Username already exists", e))?;

        let profile = ActiveModel {
            id: Set(account.id),
            instructor_number: Set(req.instructor_number),
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建教师档案失败", "Instructor profile already exists", e))?;

        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(profile.into_instructor_record(account))
    }

    pub async fn get_instructor_impl(&self, id: i64) -> Result<Option<InstructorRecord>> {
        let result = InstructorProfiles::find_by_id(id)
            .find_also_related(Accounts)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.and_then(|(profile, account)| {
            account.map(|account| profile.into_instructor_record(account))
        }))
    }

    pub async fn list_instructors_impl(&self) -> Result<Vec<InstructorRecord>> {
        let rows = InstructorProfiles::find()
            .find_also_related(Accounts)
            .order_by_asc(Column::InstructorNumber)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, account)| {
                account.map(|account| profile.into_instructor_record(account))
            })
            .collect())
    }

    /// 更新教师信息
    pub async fn update_instructor_impl(
        &self,
        id: i64,
        update: UpdateInstructorRequest,
    ) -> Result<Option<InstructorRecord>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = InstructorProfiles::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教师失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let mut account = AccountActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(display_name) = update.display_name {
            account.display_name = Set(display_name);
        }
        if let Some(password) = update.password {
            account.password_hash = Set(password);
        }
        account
            .update(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("更新教师账号失败: {e}")))?;

        if let Some(instructor_number) = update.instructor_number {
            ActiveModel {
                id: Set(id),
                instructor_number: Set(instructor_number),
            }
            .update(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("更新教师档案失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_instructor_impl(id).await
    }

    pub async fn count_instructors_impl(&self) -> Result<u64> {
        Accounts::find()
            .filter(AccountColumn::Role.eq(Role::Instructor.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教师数量失败: {e}")))
    }
}
