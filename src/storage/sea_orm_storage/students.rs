//! 学生存储操作
//!
//! 学生由一条账号记录与一条共享主键的学生档案组成，两者总是一起写入。

use super::{SeaOrmStorage, write_error};
use crate::entity::accounts::{
    ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as Accounts,
};
use crate::entity::student_profiles::{ActiveModel, Column, Entity as StudentProfiles};
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    students::{
        entities::StudentRecord,
        requests::{CreateStudentRequest, UpdateStudentRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生（账号与档案在同一事务中写入）
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<StudentRecord> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))?;

        let account = AccountActiveModel {
            username: Set(req.username),
            password_hash: Set(req.password),
            role: Set(Role::Student.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建学生账号失败", "Username already exists", e))?;

        let profile = ActiveModel {
            id: Set(account.id),
            student_number: Set(req.student_number),
            address: Set(req.address),
            phone: Set(req.phone),
        }
        .insert(&txn)
        .await
        .map_err(|e| write_error("创建学生档案失败", "Student profile already exists", e))?;

        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(profile.into_student_record(account))
    }

    /// 通过 ID 获取学生
    pub async fn get_student_impl(&self, id: i64) -> Result<Option<StudentRecord>> {
        let result = StudentProfiles::find_by_id(id)
            .find_also_related(Accounts)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.and_then(|(profile, account)| {
            account.map(|account| profile.into_student_record(account))
        }))
    }

    /// 列出全部学生，按学号排序
    pub async fn list_students_impl(&self) -> Result<Vec<StudentRecord>> {
        let rows = StudentProfiles::find()
            .find_also_related(Accounts)
            .order_by_asc(Column::StudentNumber)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, account)| {
                account.map(|account| profile.into_student_record(account))
            })
            .collect())
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentRecord>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = StudentProfiles::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut account = AccountActiveModel {
            id: Set(id),
            updated_at: Set(now),
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
            .map_err(|e| SimsError::database_operation(format!("更新学生账号失败: {e}")))?;

        let mut profile = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        let mut profile_changed = false;
        if let Some(student_number) = update.student_number {
            profile.student_number = Set(student_number);
            profile_changed = true;
        }
        if let Some(address) = update.address {
            profile.address = Set(address);
            profile_changed = true;
        }
        if let Some(phone) = update.phone {
            profile.phone = Set(phone);
            profile_changed = true;
        }
        if profile_changed {
            profile
                .update(&txn)
                .await
                .map_err(|e| SimsError::database_operation(format!("更新学生档案失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_student_impl(id).await
    }

    pub async fn count_students_impl(&self) -> Result<u64> {
        Accounts::find()
            .filter(AccountColumn::Role.eq(Role::Student.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生数量失败: {e}")))
    }
}
