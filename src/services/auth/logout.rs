use tracing::info;

use super::AuthService;

pub async fn handle_logout(service: &AuthService, token: &str) {
    if let Some(identity) = service.sessions().get(token).await {
        info!("Account {} logged out", identity.account_id);
    }
    // 会话整体移除，而不是只清掉其中的字段
    service.sessions().destroy(token).await;
}
