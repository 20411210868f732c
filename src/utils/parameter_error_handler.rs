//! 请求参数解析失败时的统一响应

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, message))
}

/// JSON 请求体错误处理器（例如成绩不是数字）
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid JSON payload for {}: {}", req.path(), err);
    let response = bad_request(format!("Invalid request body: {err}"));
    InternalError::from_response(err, response).into()
}

/// 查询参数错误处理器
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid query string for {}: {}", req.path(), err);
    let response = bad_request(format!("Invalid query parameters: {err}"));
    InternalError::from_response(err, response).into()
}

/// 路径参数错误处理器（例如 ID 不是整数）
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid path parameter for {}: {}", req.path(), err);
    let response = bad_request(format!("Invalid path parameter: {err}"));
    InternalError::from_response(err, response).into()
}
