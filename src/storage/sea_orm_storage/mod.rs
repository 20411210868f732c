//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod accounts;
mod cascade;
mod class_sections;
mod courses;
mod enrollments;
mod grades;
mod instructors;
mod schedules;
mod seed;
mod students;

use crate::config::AppConfig;
use crate::errors::{Result, SimsError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| SimsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage ready, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + 外键约束）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SimsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库只存在于单个连接中，连接不能被回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(pool_size)
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(timeout))
            .connect_with(opt)
            .await
            .map_err(|e| SimsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SimsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SimsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写操作的错误转换：唯一约束冲突与外键冲突归为 Conflict，其余为存储错误
pub(crate) fn write_error(context: &str, conflict_message: &str, err: DbErr) -> SimsError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("{context}: unique violation: {detail}");
            SimsError::conflict(conflict_message)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!("{context}: foreign key violation: {detail}");
            SimsError::conflict("Referenced record does not exist or is still in use")
        }
        _ => SimsError::database_operation(format!("{context}: {err}")),
    }
}

// Storage trait 实现
use crate::models::{
    accounts::entities::{Account, NewAccount, Role},
    class_sections::{
        entities::{ClassSection, ClassSectionSummary},
        requests::{CreateClassSectionRequest, UpdateClassSectionRequest},
    },
    courses::{
        entities::{Course, CourseOverview},
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::entities::{Enrollment, EnrollmentOwnership, RosterEntry, StudentEnrollmentView},
    grades::entities::Grade,
    instructors::{
        entities::InstructorRecord,
        requests::{CreateInstructorRequest, UpdateInstructorRequest},
    },
    schedules::{
        entities::{ScheduleSlot, ScheduleSlotListItem},
        requests::CreateScheduleSlotRequest,
    },
    seed::entities::{DemoSeed, SeededAccounts},
    students::{
        entities::StudentRecord,
        requests::{CreateStudentRequest, UpdateStudentRequest},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_account(&self, account: NewAccount, role: Role) -> Result<Account> {
        self.create_account_impl(account, role).await
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>> {
        self.get_account_by_id_impl(id).await
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.get_account_by_username_impl(username).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_accounts(&self) -> Result<u64> {
        self.count_accounts_impl().await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<StudentRecord> {
        self.create_student_impl(student).await
    }

    async fn get_student(&self, id: i64) -> Result<Option<StudentRecord>> {
        self.get_student_impl(id).await
    }

    async fn list_students(&self) -> Result<Vec<StudentRecord>> {
        self.list_students_impl().await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentRecord>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_cascade(id).await
    }

    async fn count_students(&self) -> Result<u64> {
        self.count_students_impl().await
    }

    // 教师模块
    async fn create_instructor(
        &self,
        instructor: CreateInstructorRequest,
    ) -> Result<InstructorRecord> {
        self.create_instructor_impl(instructor).await
    }

    async fn get_instructor(&self, id: i64) -> Result<Option<InstructorRecord>> {
        self.get_instructor_impl(id).await
    }

    async fn list_instructors(&self) -> Result<Vec<InstructorRecord>> {
        self.list_instructors_impl().await
    }

    async fn update_instructor(
        &self,
        id: i64,
        update: UpdateInstructorRequest,
    ) -> Result<Option<InstructorRecord>> {
        self.update_instructor_impl(id, update).await
    }

    async fn delete_instructor(&self, id: i64) -> Result<bool> {
        self.delete_instructor_cascade(id).await
    }

    async fn count_instructors(&self) -> Result<u64> {
        self.count_instructors_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_impl(id).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_courses_impl().await
    }

    async fn list_course_overview(&self) -> Result<Vec<CourseOverview>> {
        self.list_course_overview_impl().await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn count_courses(&self) -> Result<u64> {
        self.count_courses_impl().await
    }

    async fn count_class_sections_of_course(&self, course_id: i64) -> Result<u64> {
        self.count_class_sections_of_course_impl(course_id).await
    }

    // 教学班模块
    async fn create_class_section(
        &self,
        section: CreateClassSectionRequest,
    ) -> Result<ClassSection> {
        self.create_class_section_impl(section).await
    }

    async fn get_class_section(&self, id: i64) -> Result<Option<ClassSection>> {
        self.get_class_section_impl(id).await
    }

    async fn get_class_section_summary(&self, id: i64) -> Result<Option<ClassSectionSummary>> {
        self.get_class_section_summary_impl(id).await
    }

    async fn list_class_sections(&self) -> Result<Vec<ClassSectionSummary>> {
        self.list_class_sections_impl(None).await
    }

    async fn list_class_sections_by_instructor(
        &self,
        instructor_id: i64,
    ) -> Result<Vec<ClassSectionSummary>> {
        self.list_class_sections_impl(Some(instructor_id)).await
    }

    async fn update_class_section(
        &self,
        id: i64,
        update: UpdateClassSectionRequest,
    ) -> Result<Option<ClassSection>> {
        self.update_class_section_impl(id, update).await
    }

    async fn delete_class_section(&self, id: i64) -> Result<bool> {
        self.delete_class_section_cascade(id).await
    }

    async fn count_class_sections(&self) -> Result<u64> {
        self.count_class_sections_impl().await
    }

    // 课表模块
    async fn create_schedule_slot(&self, slot: CreateScheduleSlotRequest) -> Result<ScheduleSlot> {
        self.create_schedule_slot_impl(slot).await
    }

    async fn list_schedule_slots(&self) -> Result<Vec<ScheduleSlotListItem>> {
        self.list_schedule_slots_impl().await
    }

    async fn list_schedule_slots_by_class_section(
        &self,
        class_section_id: i64,
    ) -> Result<Vec<ScheduleSlot>> {
        self.list_schedule_slots_by_class_section_impl(class_section_id)
            .await
    }

    async fn delete_schedule_slot(&self, id: i64) -> Result<bool> {
        self.delete_schedule_slot_impl(id).await
    }

    // 选课模块
    async fn enroll_student(&self, student_id: i64, class_section_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(student_id, class_section_id).await
    }

    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(id).await
    }

    async fn get_enrollment_ownership(&self, id: i64) -> Result<Option<EnrollmentOwnership>> {
        self.get_enrollment_ownership_impl(id).await
    }

    async fn list_class_roster(&self, class_section_id: i64) -> Result<Vec<RosterEntry>> {
        self.list_class_roster_impl(class_section_id).await
    }

    async fn list_student_enrollments(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentView>> {
        self.list_student_enrollments_impl(student_id).await
    }

    async fn unenroll(&self, class_section_id: i64, enrollment_id: i64) -> Result<bool> {
        self.unenroll_cascade(class_section_id, enrollment_id).await
    }

    // 成绩模块
    async fn upsert_grade(&self, enrollment_id: i64, score: f64) -> Result<Grade> {
        self.upsert_grade_impl(enrollment_id, score).await
    }

    async fn get_grade_by_enrollment(&self, enrollment_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_enrollment_impl(enrollment_id).await
    }

    // 演示数据
    async fn seed_demo_data(&self, seed: DemoSeed) -> Result<Option<SeededAccounts>> {
        self.seed_demo_data_impl(seed).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::{
        class_sections::requests::CreateClassSectionRequest,
        courses::requests::CreateCourseRequest,
        instructors::requests::CreateInstructorRequest,
        schedules::requests::CreateScheduleSlotRequest, students::requests::CreateStudentRequest,
    };

    /// 每个测试独占一个迁移完成的内存库
    pub(crate) async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory storage should start")
    }

    pub(crate) fn student_request(username: &str, number: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            username: username.to_string(),
            password: "digest".to_string(),
            display_name: format!("Student {username}"),
            student_number: number.to_string(),
            address: "Jl. Merdeka 1".to_string(),
            phone: "081234567890".to_string(),
        }
    }

    pub(crate) fn instructor_request(username: &str, number: &str) -> CreateInstructorRequest {
        CreateInstructorRequest {
            username: username.to_string(),
            password: "digest".to_string(),
            display_name: format!("Dr. {username}"),
            instructor_number: number.to_string(),
        }
    }

    /// 一组相互关联的记录：一名教师任教的教学班、一名已选课且有成绩的学生
    pub(crate) struct Fixture {
        pub storage: SeaOrmStorage,
        pub student_id: i64,
        pub instructor_id: i64,
        pub course_id: i64,
        pub class_section_id: i64,
        pub schedule_slot_id: i64,
        pub enrollment_id: i64,
    }

    pub(crate) async fn fixture() -> Fixture {
        let storage = memory_storage().await;

        let student = storage
            .create_student_impl(student_request("student1", "20231001"))
            .await
            .expect("student");
        let instructor = storage
            .create_instructor_impl(instructor_request("instructor1", "NIDN12345"))
            .await
            .expect("instructor");
        let course = storage
            .create_course_impl(CreateCourseRequest {
                code: "NET101".to_string(),
                name: "Computer Networks".to_string(),
                credit_units: 3,
            })
            .await
            .expect("course");
        let section = storage
            .create_class_section_impl(CreateClassSectionRequest {
                name: "Networks - Morning".to_string(),
                course_id: course.id,
                instructor_id: Some(instructor.id),
            })
            .await
            .expect("class section");
        let slot = storage
            .create_schedule_slot_impl(CreateScheduleSlotRequest {
                class_section_id: section.id,
                day: "Monday".to_string(),
                time_range: "08:00-10:00".to_string(),
            })
            .await
            .expect("schedule slot");
        let enrollment = storage
            .enroll_student_impl(student.id, section.id)
            .await
            .expect("enrollment");
        storage
            .upsert_grade_impl(enrollment.id, 85.0)
            .await
            .expect("grade");

        Fixture {
            storage,
            student_id: student.id,
            instructor_id: instructor.id,
            course_id: course.id,
            class_section_id: section.id,
            schedule_slot_id: slot.id,
            enrollment_id: enrollment.id,
        }
    }
}
