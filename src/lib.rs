//! SIMS - 学生信息管理系统后端服务
//!
//! 基于 Actix Web 构建，管理员、教师、学生三种角色分别访问各自范围内的
//! 学生档案、课程、教学班、课表、选课与成绩。
//!
//! # 架构
//! - `cache`: 会话缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 会话认证、角色守卫与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 按角色划分的业务逻辑层
//! - `storage`: 数据存储层（SeaORM），含事务级联删除
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
