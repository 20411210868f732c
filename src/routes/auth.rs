use actix_web::{
    HttpResponse, Result as ActixResult,
    cookie::{Cookie, SameSite, time::Duration},
    web,
};

use crate::config::AppConfig;
use crate::middlewares::{RateLimit, RequireSession, SessionToken};
use crate::models::{ApiResponse, auth::Identity, auth::LoginRequest};
use crate::services::AuthService;

// 会话 Cookie，仅限 HTTP 访问
fn session_cookie(token: String, max_age_secs: u64) -> Cookie<'static> {
    let config = &AppConfig::get().session;
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs as i64))
        .finish()
}

pub async fn login(
    service: web::Data<AuthService>,
    login_request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let response = service.login(login_request.into_inner()).await?;
    let cookie = session_cookie(response.session_token.clone(), response.expires_in);
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response, "Login successful")))
}

pub async fn logout(
    service: web::Data<AuthService>,
    token: SessionToken,
) -> ActixResult<HttpResponse> {
    service.logout(&token.0).await;

    let mut cookie = session_cookie(String::new(), 0);
    cookie.make_removal();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success_empty("Logged out")))
}

pub async fn me(service: web::Data<AuthService>, identity: Identity) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.me(&identity), "OK")))
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::scope("")
                    .wrap(RequireSession::from_config())
                    .route("/logout", web::post().to(logout))
                    .route("/me", web::get().to(me)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{configure_services, test_support::seeded_state};
    use actix_web::{App, http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_login_me_logout_flow() {
        let (storage, sessions) = seeded_state().await;
        let app = test::init_service(
            App::new()
                .configure(configure_services(storage, sessions.clone()))
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("X-Real-IP", "198.51.100.10"))
            .set_json(json!({ "username": "student1", "password": "student123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "sims_session")
            .expect("session cookie set");
        assert!(cookie.http_only().unwrap_or(false));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["home"], "/api/v1/student/dashboard");
        assert!(body["data"]["account"].get("password_hash").is_none());
        let token = body["data"]["session_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .cookie(Cookie::new("sims_session", token.clone()))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["identity"]["role"], "student");

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(sessions.get(&token).await.is_none());

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_failed_login_is_generic() {
        let (storage, sessions) = seeded_state().await;
        let app = test::init_service(
            App::new()
                .configure(configure_services(storage, sessions))
                .configure(configure_auth_routes),
        )
        .await;

        let mut messages = Vec::new();
        for (username, password) in [("student1", "wrong123"), ("ghost", "student123")] {
            let req = test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .insert_header(("X-Real-IP", "198.51.100.20"))
                .set_json(json!({ "username": username, "password": password }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: serde_json::Value = test::read_body_json(resp).await;
            messages.push(body["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
        assert_eq!(messages[0], "Invalid username or password");
    }
}
