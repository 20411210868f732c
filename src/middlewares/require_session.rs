/*!
 * 会话认证中间件
 *
 * 从 `Authorization: Bearer <token>` 请求头或会话 Cookie 中读取令牌，
 * 在会话缓存中查找对应的身份，并放入请求扩展中供后续中间件与处理函数使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::{RequireRole, RequireSession};
 * use crate::models::accounts::entities::Role;
 *
 * App::new().service(
 *     web::scope("/api/v1/admin")
 *         .wrap(RequireRole::new(Role::Admin)) // 后执行
 *         .wrap(RequireSession::from_config()) // 先执行
 *         .route("/dashboard", web::get().to(dashboard)),
 * );
 * ```
 *
 * 处理函数可以直接把 `Identity` 作为参数提取。
 *
 * 没有有效会话时返回 401，并在 `data.redirect` 中给出登录入口。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error, info};

use super::create_error_response;
use crate::config::AppConfig;
use crate::errors::SimsError;
use crate::models::auth::Identity;
use crate::services::auth::{GuardRejection, SessionStore};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 当前请求使用的会话令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

#[derive(Clone)]
pub struct RequireSession {
    cookie_name: String,
}

impl RequireSession {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    /// 使用配置中的 Cookie 名称
    pub fn from_config() -> Self {
        Self::new(AppConfig::get().session.cookie_name.clone())
    }
}

// 请求头优先，其次是 Cookie
fn extract_token(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    let from_header = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    from_header.or_else(|| req.cookie(cookie_name).map(|c| c.value().to_string()))
}

fn unauthenticated() -> HttpResponse {
    let rejection = GuardRejection::Unauthenticated;
    create_error_response(&rejection.to_error(), rejection.redirect())
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
    cookie_name: String,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let cookie_name = self.cookie_name.clone();

        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            let Some(sessions) = req.app_data::<web::Data<SessionStore>>().cloned() else {
                error!("Session store is not registered in app data");
                let err = SimsError::cache_connection("Session store unavailable");
                return Ok(req.into_response(err.to_http_response(None).map_into_right_body()));
            };

            let Some(token) = extract_token(&req, &cookie_name) else {
                info!("No session token on request to {}", req.path());
                return Ok(req.into_response(unauthenticated().map_into_right_body()));
            };

            match sessions.get(&token).await {
                Some(identity) => {
                    debug!(
                        "Session accepted for account {} ({})",
                        identity.account_id, identity.role
                    );
                    req.extensions_mut().insert(identity);
                    req.extensions_mut().insert(SessionToken(token));
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                None => {
                    info!("Unknown or expired session on request to {}", req.path());
                    Ok(req.into_response(unauthenticated().map_into_right_body()))
                }
            }
        })
    }
}

// 处理函数中直接提取当前身份
impl FromRequest for Identity {
    type Error = SimsError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(|| GuardRejection::Unauthenticated.to_error()),
        )
    }
}

impl FromRequest for SessionToken {
    type Error = SimsError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionToken>()
                .cloned()
                .ok_or_else(|| GuardRejection::Unauthenticated.to_error()),
        )
    }
}
