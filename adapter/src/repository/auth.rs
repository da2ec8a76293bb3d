use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::auth::{event::CreateToken, AccessToken};
use kernel::model::id::UserId;
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

use crate::database::{model::user::UserPasswordRow, ConnectionPool};
use crate::redis::{
    model::{RedisKey, RedisValue},
    RedisClient,
};

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key: AuthorizationKey = access_token.into();
        self.kv
            .get(&key)
            .await
            .map(|x| x.map(AuthorizedUserId::into_inner))
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row = sqlx::query_as::<_, UserPasswordRow>(
            r#"
            SELECT user_id, password_hash FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 未登録のアドレスも認証失敗として同じエラーにする
        let row = row.ok_or(AppError::UnauthenticatedError)?;

        verify_password(password, &row.password_hash)?;

        Ok(row.user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        // 推測されない不透明なトークンを発行し、TTL つきで保存する
        let access_token = AccessToken(format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        ));
        let key: AuthorizationKey = (&access_token).into();
        self.kv
            .set_ex(&key, &AuthorizedUserId(event.user_id), self.ttl)
            .await?;
        Ok(access_token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        let key: AuthorizationKey = (&access_token).into();
        self.kv.delete(&key).await
    }
}

pub struct AuthorizationKey(String);

pub struct AuthorizedUserId(UserId);

impl AuthorizedUserId {
    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl From<&AccessToken> for AuthorizationKey {
    fn from(value: &AccessToken) -> Self {
        Self(value.0.clone())
    }
}

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedUserId;

    fn inner(&self) -> String {
        format!("auth:{}", self.0)
    }
}

impl RedisValue for AuthorizedUserId {
    fn inner(&self) -> String {
        self.0.raw().to_string()
    }
}

impl TryFrom<String> for AuthorizedUserId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(UserId::from(uuid::Uuid::parse_str(&value)?)))
    }
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(AppError::PasswordHashError)?
        .to_string())
}

pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let parsed = PasswordHash::new(hash).map_err(AppError::PasswordHashError)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::UnauthenticatedError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hashed = hash_password("la sidrina 2025").unwrap();
        // ハッシュは平文を含まない
        assert!(!hashed.contains("sidrina"));

        assert!(verify_password("la sidrina 2025", &hashed).is_ok());

        let err = verify_password("wrong password", &hashed).unwrap_err();
        assert!(matches!(err, AppError::UnauthenticatedError));
    }

    #[test]
    fn authorized_user_id_round_trips_through_redis_value() {
        let user_id = UserId::new();
        let value = AuthorizedUserId(user_id);
        let restored = AuthorizedUserId::try_from(value.inner()).unwrap();
        assert_eq!(restored.into_inner(), user_id);
    }
}
