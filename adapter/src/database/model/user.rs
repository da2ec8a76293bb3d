use chrono::{DateTime, Utc};
use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::AppError;
use std::str::FromStr;

// 認証に使う最小限の行
#[derive(sqlx::FromRow)]
pub struct UserPasswordRow {
    pub user_id: UserId,
    pub password_hash: String,
}

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            user_name,
            email,
            phone,
            role_name,
            created_at,
        } = value;
        Ok(User {
            user_id,
            user_name,
            email,
            phone,
            role: Role::from_str(&role_name)
                .map_err(|e| AppError::ConversionEntityError(e.to_string()))?,
            created_at,
        })
    }
}
