//! 演示数据写入
//!
//! 全部记录在一个事务中写入，任一步失败则数据库保持为空，下次启动会重新写入。

use super::{SeaOrmStorage, write_error};
use crate::entity::accounts::{ActiveModel as AccountActiveModel, Entity as Accounts};
use crate::entity::class_sections::ActiveModel as SectionActiveModel;
use crate::entity::courses::ActiveModel as CourseActiveModel;
use crate::entity::enrollments::ActiveModel as EnrollmentActiveModel;
use crate::entity::grades::ActiveModel as GradeActiveModel;
use crate::entity::instructor_profiles::ActiveModel as InstructorActiveModel;
use crate::entity::schedule_slots::ActiveModel as SlotActiveModel;
use crate::entity::student_profiles::ActiveModel as StudentActiveModel;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    seed::entities::{DemoSeed, SeededAccounts},
};
use sea_orm::{
    ActiveModelTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};

fn seed_error(step: &str, e: sea_orm::DbErr) -> SimsError {
    write_error(&format!("写入演示{step}失败"), "Seed data conflicts with existing records", e)
}

async fn insert_account(
    txn: &DatabaseTransaction,
    username: String,
    password_hash: String,
    display_name: String,
    role: Role,
    now: i64,
) -> Result<i64> {
    let account = AccountActiveModel {
        username: Set(username),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        display_name: Set(display_name),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(|e| seed_error("账号", e))?;
    Ok(account.id)
}

impl SeaOrmStorage {
    /// 数据库中没有账号时写入演示数据，已有账号返回 `None`
    pub async fn seed_demo_data_impl(&self, seed: DemoSeed) -> Result<Option<SeededAccounts>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SimsError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Accounts::find()
            .count(&txn)
            .await
            .map_err(|e| SimsError::database_operation(format!("统计账号失败: {e}")))?;
        if existing > 0 {
            return Ok(None);
        }

        let admin_id = insert_account(
            &txn,
            seed.admin.username,
            seed.admin.password_hash,
            seed.admin.display_name,
            Role::Admin,
            now,
        )
        .await?;

        let instructor_id = insert_account(
            &txn,
            seed.instructor.username,
            seed.instructor.password,
            seed.instructor.display_name,
            Role::Instructor,
            now,
        )
        .await?;
        InstructorActiveModel {
            id: Set(instructor_id),
            instructor_number: Set(seed.instructor.instructor_number),
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("教师档案", e))?;

        let student_id = insert_account(
            &txn,
            seed.student.username,
            seed.student.password,
            seed.student.display_name,
            Role::Student,
            now,
        )
        .await?;
        StudentActiveModel {
            id: Set(student_id),
            student_number: Set(seed.student.student_number),
            address: Set(seed.student.address),
            phone: Set(seed.student.phone),
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("学生档案", e))?;

        let course = CourseActiveModel {
            code: Set(seed.course.code),
            name: Set(seed.course.name),
            credit_units: Set(seed.course.credit_units),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("课程", e))?;

        let section = SectionActiveModel {
            name: Set(seed.section_name),
            course_id: Set(course.id),
            instructor_id: Set(Some(instructor_id)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("教学班", e))?;

        SlotActiveModel {
            class_section_id: Set(section.id),
            day: Set(seed.schedule_day),
            time_range: Set(seed.schedule_time_range),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("课表", e))?;

        let enrollment = EnrollmentActiveModel {
            student_id: Set(student_id),
            class_section_id: Set(section.id),
            enrolled_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("选课记录", e))?;

        GradeActiveModel {
            enrollment_id: Set(enrollment.id),
            score: Set(seed.score),
            graded_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| seed_error("成绩", e))?;

        txn.commit()
            .await
            .map_err(|e| SimsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(SeededAccounts {
            admin_id,
            instructor_id,
            student_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{instructor_request, memory_storage, student_request};
    use super::*;
    use crate::models::{accounts::entities::NewAccount, courses::requests::CreateCourseRequest};

    fn demo() -> DemoSeed {
        DemoSeed {
            admin: NewAccount {
                username: "admin".to_string(),
                password_hash: "digest".to_string(),
                display_name: "Administrator".to_string(),
            },
            instructor: instructor_request("instructor1", "NIDN12345"),
            student: student_request("student1", "20231001"),
            course: CreateCourseRequest {
                code: "NET101".to_string(),
                name: "Computer Networks".to_string(),
                credit_units: 3,
            },
            section_name: "Networks - Morning".to_string(),
            schedule_day: "Monday".to_string(),
            schedule_time_range: "08:00-10:00".to_string(),
            score: 85.0,
        }
    }

    #[tokio::test]
    async fn test_seed_links_every_record() {
        let storage = memory_storage().await;
        let ids = storage.seed_demo_data_impl(demo()).await.unwrap().unwrap();

        let sections = storage
            .list_class_sections_impl(Some(ids.instructor_id))
            .await
            .unwrap();
        assert_eq!(sections.len(), 1);
        let roster = storage.list_class_roster_impl(sections[0].id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].student_id, ids.student_id);
        assert_eq!(roster[0].score, Some(85.0));
    }

    #[tokio::test]
    async fn test_seed_skipped_when_accounts_exist() {
        let storage = memory_storage().await;
        storage
            .create_account_impl(
                NewAccount {
                    username: "root".to_string(),
                    password_hash: "digest".to_string(),
                    display_name: "Root".to_string(),
                },
                Role::Admin,
            )
            .await
            .unwrap();

        assert!(storage.seed_demo_data_impl(demo()).await.unwrap().is_none());
        assert_eq!(storage.count_accounts_impl().await.unwrap(), 1);
        assert_eq!(storage.count_courses_impl().await.unwrap(), 0);
    }
}
