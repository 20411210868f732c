use serde::Serialize;

/// 业务错误码，随 `ApiResponse.code` 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,

    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2002,
    RateLimitExceeded = 2003,

    NotFound = 3000,
    Conflict = 3001,

    InternalServerError = 5000,
}
