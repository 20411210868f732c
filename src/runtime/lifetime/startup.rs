use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    accounts::entities::NewAccount, courses::requests::CreateCourseRequest,
    instructors::requests::CreateInstructorRequest, seed::entities::DemoSeed,
    students::requests::CreateStudentRequest,
};
use crate::services::auth::SessionStore;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub sessions: SessionStore,
}

/// 演示账号、课程、教学班与一条已评分的选课记录
///
/// 初始账号密码公开在文档中，仅用于演示与复现。
fn demo_seed() -> Result<DemoSeed> {
    Ok(DemoSeed {
        admin: NewAccount {
            username: "admin".to_string(),
            password_hash: hash_password("admin123")?,
            display_name: "Administrator".to_string(),
        },
        instructor: CreateInstructorRequest {
            username: "instructor1".to_string(),
            password: hash_password("instructor123")?,
            display_name: "Dr. Instructor One".to_string(),
            instructor_number: "NIDN12345".to_string(),
        },
        student: CreateStudentRequest {
            username: "student1".to_string(),
            password: hash_password("student123")?,
            display_name: "Budi Student".to_string(),
            student_number: "20231001".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            phone: "081234567890".to_string(),
        },
        course: CreateCourseRequest {
            code: "NET101".to_string(),
            name: "Computer Networks".to_string(),
            credit_units: 3,
        },
        section_name: "Networks - Morning".to_string(),
        schedule_day: "Monday".to_string(),
        schedule_time_range: "08:00-10:00".to_string(),
        score: 85.0,
    })
}

/// 首次启动时写入演示数据
///
/// 只有数据库中没有任何账号时才会执行，返回是否写入了数据。
/// 全部记录在同一事务中提交，写入失败时下次启动会重试。
pub async fn seed_initial_data(storage: &dyn Storage) -> Result<bool> {
    let count = storage.count_accounts().await?;
    if count > 0 {
        debug!(
            "Database already has {} account(s), skipping seed data",
            count
        );
        return Ok(false);
    }

    info!("No accounts found in database, writing seed data...");

    match storage.seed_demo_data(demo_seed()?).await? {
        Some(ids) => {
            info!(
                "Seed data written (admin ID: {}, instructor ID: {}, student ID: {})",
                ids.admin_id, ids.instructor_id, ids.student_id
            );
            Ok(true)
        }
        None => {
            debug!("Accounts appeared before seed data was written, skipping");
            Ok(false)
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、会话缓存和初始数据
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    if config.seed.enabled {
        seed_initial_data(storage.as_ref()).await?;
    } else {
        debug!("Seed data disabled by configuration");
    }

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::for_sessions(&config.session));
    let sessions = SessionStore::new(cache, config.session.ttl_secs);
    warn!("Session cache initialized");

    Ok(StartupContext { storage, sessions })
}
