//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode, RedirectHint};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_sims_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SimsError {
            $($variant(String),)*
        }

        impl SimsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SimsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SimsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SimsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SimsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SimsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_sims_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    FileOperation("E005", "File Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Conflict("E008", "Integrity Conflict"),
    Serialization("E009", "Serialization Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
}

impl SimsError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 面向用户的提示信息
    ///
    /// 存储层错误统一包装成 "Operation failed"，其余错误直接返回详情。
    pub fn user_message(&self) -> String {
        match self {
            SimsError::DatabaseOperation(msg)
            | SimsError::DatabaseConnection(msg)
            | SimsError::DatabaseConfig(msg)
            | SimsError::CacheConnection(msg)
            | SimsError::FileOperation(msg)
            | SimsError::Serialization(msg) => format!("Operation failed: {msg}"),
            other => other.message().to_string(),
        }
    }

    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SimsError::Validation(_) => ErrorCode::ValidationFailed,
            SimsError::NotFound(_) => ErrorCode::NotFound,
            SimsError::Conflict(_) => ErrorCode::Conflict,
            SimsError::Authentication(_) => ErrorCode::Unauthorized,
            SimsError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 生成 HTTP 响应，可附带重定向提示
    pub fn to_http_response(&self, redirect: Option<&str>) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match redirect {
            Some(path) => builder.json(ApiResponse::error(
                self.error_code(),
                RedirectHint::to(path),
                self.user_message(),
            )),
            None => builder.json(ApiResponse::error_empty(
                self.error_code(),
                self.user_message(),
            )),
        }
    }
}

impl fmt::Display for SimsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SimsError {}

impl ResponseError for SimsError {
    fn status_code(&self) -> StatusCode {
        match self {
            SimsError::Validation(_) => StatusCode::BAD_REQUEST,
            SimsError::NotFound(_) => StatusCode::NOT_FOUND,
            SimsError::Conflict(_) => StatusCode::CONFLICT,
            SimsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SimsError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response(None)
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SimsError {
    fn from(err: sea_orm::DbErr) -> Self {
        SimsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SimsError {
    fn from(err: std::io::Error) -> Self {
        SimsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SimsError {
    fn from(err: serde_json::Error) -> Self {
        SimsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimsError>;
