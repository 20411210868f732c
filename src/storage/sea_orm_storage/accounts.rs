//! 账号存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::accounts::{ActiveModel, Column, Entity as Accounts};
use crate::errors::{Result, SimsError};
use crate::models::accounts::entities::{Account, NewAccount, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建账号
    pub async fn create_account_impl(&self, account: NewAccount, role: Role) -> Result<Account> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(account.username),
            password_hash: Set(account.password_hash),
            role: Set(role.to_string()),
            display_name: Set(account.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建账号失败", "Username already exists", e))?;

        Ok(result.into_account())
    }

    /// 通过 ID 获取账号
    pub async fn get_account_by_id_impl(&self, id: i64) -> Result<Option<Account>> {
        let result = Accounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 通过用户名获取账号
    pub async fn get_account_by_username_impl(&self, username: &str) -> Result<Option<Account>> {
        let result = Accounts::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询账号失败: {e}")))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 更新账号最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Accounts::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_accounts_impl(&self) -> Result<u64> {
        Accounts::find()
            .count(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询账号数量失败: {e}")))
    }
}
