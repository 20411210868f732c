pub mod guard;
pub mod login;
pub mod logout;
pub mod session;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::{Identity, LoginRequest, LoginResponse, MeResponse};
use crate::storage::Storage;

pub use guard::{GuardRejection, LOGIN_PATH, authorize};
pub use session::SessionStore;

pub struct AuthService {
    storage: Arc<dyn Storage>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, sessions: SessionStore) -> Self {
        Self { storage, sessions }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    // 登录并创建会话
    pub async fn login(&self, login_request: LoginRequest) -> Result<LoginResponse> {
        login::handle_login(self, login_request).await
    }

    // 注销会话
    pub async fn logout(&self, token: &str) {
        logout::handle_logout(self, token).await
    }

    // 当前会话信息
    pub fn me(&self, identity: &Identity) -> MeResponse {
        MeResponse {
            identity: identity.clone(),
            home: identity.role.home_path().to_string(),
        }
    }
}
