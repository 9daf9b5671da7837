use crate::error::AppError;
use crate::models::User;
use chrono::Utc;
use sqlx::SqlitePool;

pub const USER_EXISTS_MESSAGE: &str = "User already exists";

/// Expected failures of user persistence.
#[derive(Debug)]
pub enum UserError {
    /// The username is taken.
    AlreadyExists,
    Database(sqlx::Error),
}

impl From<sqlx::Error> for UserError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return UserError::AlreadyExists;
            }
        }
        UserError::Database(error)
    }
}

impl From<UserError> for AppError {
    fn from(error: UserError) -> AppError {
        match error {
            UserError::AlreadyExists => AppError::BadRequest(USER_EXISTS_MESSAGE.to_string()),
            UserError::Database(e) => AppError::from(e),
        }
    }
}

/// Access to the `users` table.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Round-trips a trivial query; used by the health check.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Inserts a user. The check-then-insert is backed by the UNIQUE
    /// constraint, so a concurrent duplicate still comes back as `AlreadyExists`.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User, UserError> {
        let mut conn = self.pool.acquire().await?;

        let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;
        if existing.is_some() {
            return Err(UserError::AlreadyExists);
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(user)
    }
}
