use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::UserId;
use kernel::model::user::{event::CreateUser, User};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};
use crate::repository::auth::hash_password;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    // 利用者を登録する。ロールは常に User で作成される
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed = hash_password(&event.password)?;

        let res = sqlx::query(
            r#"
            INSERT INTO users (user_id, user_name, email, password_hash, phone, role_id)
            SELECT $1, $2, $3, $4, $5, role_id
            FROM roles
            WHERE role_name = 'User'
            "#,
        )
        .bind(user_id)
        .bind(&event.user_name)
        .bind(&event.email)
        .bind(hashed)
        .bind(&event.phone)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            // メールアドレスは一意。重複は利用者起因のエラーとして返す
            if e.as_database_error()
                .and_then(|de| de.code())
                .is_some_and(|code| code == "23505")
            {
                AppError::UnprocessableEntity(format!(
                    "email ({}) is already registered",
                    event.email
                ))
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        self.find_current_user(user_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound("created user was not found".into()))
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.user_id,
                u.user_name,
                u.email,
                u.phone,
                r.role_name,
                u.created_at
            FROM users AS u
            INNER JOIN roles AS r ON u.role_id = r.role_id
            WHERE u.user_id = $1
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn register_and_fetch_round_trip(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let user = repo
            .create(CreateUser {
                user_name: "Carmen Díaz".into(),
                email: "carmen@example.com".into(),
                password: "correct horse battery staple".into(),
                phone: Some("985000111".into()),
            })
            .await?;

        assert_eq!(user.user_name, "Carmen Díaz");
        assert_eq!(user.role, Role::User);

        let found = repo.find_current_user(user.user_id).await?.unwrap();
        assert_eq!(found, user);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn duplicate_email_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        // fixtures/common.sql で登録済みのアドレス
        let err = repo
            .create(CreateUser {
                user_name: "Someone Else".into(),
                email: "alba@example.com".into(),
                password: "password".into(),
                phone: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        Ok(())
    }
}
