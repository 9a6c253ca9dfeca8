//! Users repository for database operations

use sqlx::{Pool, Postgres};

use super::map_write_error;
use crate::{
    error::{AppError, AppResult},
    models::{permission::Permission, user::User},
};

const USER_COLUMNS: &str =
    "id, username, password, first_name, last_name, email, is_superuser, is_active, created_at";

/// Fields of a user about to be inserted (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub is_superuser: bool,
    pub permissions: &'a [Permission],
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Permission codenames granted to a user
    pub async fn get_permissions(&self, user_id: i32) -> AppResult<Vec<String>> {
        let codenames: Vec<String> = sqlx::query_scalar(
            "SELECT codename FROM user_permissions WHERE user_id = $1 ORDER BY codename",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(codenames)
    }

    /// Insert a user and their permission grants in one transaction
    pub async fn create(&self, user: &NewUser<'_>) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO users (username, password, first_name, last_name, email, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(user.username)
            .bind(user.password_hash)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.email)
            .bind(user.is_superuser)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "username", "A user with that username already exists."))?;

        for permission in user.permissions {
            sqlx::query(
                "INSERT INTO user_permissions (user_id, codename) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(created.id)
            .bind(permission.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(created)
    }
}
