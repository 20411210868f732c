/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireSession 之后执行，用于验证当前身份是否具有路由要求的角色。
 * 判定逻辑与业务层共用 `services::auth::authorize`。
 *
 * ```rust,ignore
 * web::scope("/api/v1/instructor")
 *     .wrap(RequireRole::new(Role::Instructor))
 *     .wrap(RequireSession::from_config())
 * ```
 *
 * 角色不符时返回 403，并在 `data.redirect` 中给出当前角色的首页。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::warn;

use super::create_error_response;
use crate::models::{accounts::entities::Role, auth::Identity};
use crate::services::auth::{GuardRejection, authorize};

#[derive(Clone)]
pub struct RequireRole {
    required_role: Role,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: Role) -> Self {
        Self {
            required_role: role,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_role: self.required_role,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required_role = self.required_role;

        Box::pin(async move {
            let identity = req.extensions().get::<Identity>().cloned();

            match authorize(identity.as_ref(), Some(required_role)) {
                Ok(_) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(rejection) => {
                    if let GuardRejection::Forbidden { .. } = rejection
                        && let Some(identity) = &identity
                    {
                        warn!(
                            "Access denied for account {} (role: {}) on {}: {} role required",
                            identity.account_id,
                            identity.role,
                            req.path(),
                            required_role
                        );
                    }
                    let response = create_error_response(&rejection.to_error(), rejection.redirect());
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::middlewares::RequireSession;
    use crate::services::auth::SessionStore;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};
    use std::sync::Arc;

    async fn dashboard() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_wrong_role_gets_redirect_to_own_home() {
        let sessions = SessionStore::new(Arc::new(MokaCacheWrapper::new(100, 60)), 60);
        let student = sessions
            .create(&Identity::new(3, Role::Student, "Budi Student"))
            .await
            .unwrap();
        let admin = sessions
            .create(&Identity::new(1, Role::Admin, "Administrator"))
            .await
            .unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::new(sessions)).service(
                web::scope("/admin")
                    .wrap(RequireRole::new(Role::Admin))
                    .wrap(RequireSession::new("sims_session"))
                    .route("/dashboard", web::get().to(dashboard)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin/dashboard")
            .insert_header(("Authorization", format!("Bearer {student}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect"], "/api/v1/student/dashboard");
        assert_eq!(body["message"], "Access denied: admin role required");

        let req = test::TestRequest::get()
            .uri("/admin/dashboard")
            .insert_header(("Authorization", format!("Bearer {admin}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_without_session_layer_is_unauthenticated() {
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(RequireRole::new(Role::Admin))
                    .route("/dashboard", web::get().to(dashboard)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin/dashboard").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
