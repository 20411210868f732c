use tracing::{info, warn};

use crate::errors::{Result, SimsError};
use crate::models::auth::{Identity, LoginRequest, LoginResponse};
use crate::utils::password::{verify_dummy_password, verify_password};

use super::AuthService;

const LOGIN_FAILED: &str = "Invalid username or password";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
) -> Result<LoginResponse> {
    let storage = service.storage();

    // 1. 根据用户名获取账号
    let account = storage
        .get_account_by_username(login_request.username.trim())
        .await?;

    // 2. 验证密码，用户不存在与密码错误返回同一错误，且同样执行一次哈希校验
    let verified = match &account {
        Some(account) => verify_password(&login_request.password, &account.password_hash),
        None => verify_dummy_password(&login_request.password),
    };
    let account = match account {
        Some(account) if verified => account,
        _ => {
            info!("Failed login attempt for username {}", login_request.username);
            return Err(SimsError::authentication(LOGIN_FAILED));
        }
    };

    // 3. 创建会话
    let identity = Identity::from(&account);
    let session_token = service.sessions().create(&identity).await?;

    // 4. 更新最后登录时间，失败不影响登录
    if let Err(e) = storage.update_last_login(account.id).await {
        warn!("Failed to update last login for {}: {}", account.id, e);
    }

    info!("Account {} logged in as {}", account.username, account.role);

    Ok(LoginResponse {
        session_token,
        expires_in: service.sessions().ttl_secs(),
        home: account.role.home_path().to_string(),
        account,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::MokaCacheWrapper;
    use crate::models::accounts::entities::Role;
    use crate::runtime::lifetime::startup::test_support::seeded_storage;
    use crate::services::auth::SessionStore;

    async fn service() -> AuthService {
        let sessions = SessionStore::new(Arc::new(MokaCacheWrapper::new(100, 60)), 60);
        AuthService::new(seeded_storage().await, sessions)
    }

    fn credentials(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_creates_session() {
        let service = service().await;
        let response = service
            .login(credentials("instructor1", "instructor123"))
            .await
            .unwrap();

        assert_eq!(response.account.role, Role::Instructor);
        assert_eq!(response.home, "/api/v1/instructor/classes");
        assert_eq!(response.expires_in, 60);

        let identity = service
            .sessions()
            .get(&response.session_token)
            .await
            .expect("session stored");
        assert_eq!(identity.account_id, response.account.id);
        assert_eq!(identity.display_name, "Dr. Instructor One");

        let account = service
            .storage()
            .get_account_by_id(response.account.id)
            .await
            .unwrap()
            .unwrap();
        assert!(account.last_login.is_some());
    }

    #[tokio::test]
    async fn test_wrong_password_matches_unknown_user() {
        let service = service().await;

        let wrong_password = service
            .login(credentials("student1", "student124"))
            .await
            .unwrap_err();
        let unknown_user = service
            .login(credentials("nobody", "student123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, SimsError::Authentication(_)));
        assert!(matches!(unknown_user, SimsError::Authentication(_)));
        assert_eq!(wrong_password.message(), unknown_user.message());
        assert_eq!(wrong_password.message(), LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_logout_removes_session() {
        let service = service().await;
        let response = service
            .login(credentials("admin", "admin123"))
            .await
            .unwrap();

        service.logout(&response.session_token).await;
        assert!(service.sessions().get(&response.session_token).await.is_none());

        let me = service.me(&Identity::from(&response.account));
        assert_eq!(me.home, "/api/v1/admin/dashboard");
    }
}
