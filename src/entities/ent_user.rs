// User - site accounts; authors of posts and comments, ends of follow edges

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;

use super::Entity;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;
use crate::infrastructure::security;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Fields needed to register an account.
#[derive(Debug, Clone, Default)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const NAME: &'static str = "User";
    const SELECT: &'static str = "SELECT t.id, t.username, t.first_name, t.last_name, t.email, \
         t.password_hash, t.date_joined FROM users t";
}

impl User {
    pub async fn create(db: &Database, new_user: NewUser<'_>) -> AppResult<User> {
        let password_hash = security::hash_password(new_user.password)?;
        let result = sqlx::query(
            "INSERT INTO users (username, first_name, last_name, email, password_hash, date_joined) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new_user.username)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Validation(format!(
                        "A user with username {} already exists",
                        new_user.username
                    ));
                }
            }
            AppError::from(e)
        })?;

        info!("Created user {} (ID: {})", new_user.username, result.last_insert_rowid());
        Self::gen_enforce(db, result.last_insert_rowid()).await
    }

    pub async fn gen_by_username(db: &Database, username: &str) -> AppResult<Option<User>> {
        let sql = format!("{} WHERE t.username = ?", Self::SELECT);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(db.pool())
            .await?;
        Ok(user)
    }

    /// Lookup by username that maps a miss to 404.
    pub async fn gen_by_username_enforce(db: &Database, username: &str) -> AppResult<User> {
        Self::gen_by_username(db, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
    }

    /// Username/password check for the login form.
    pub async fn authenticate(db: &Database, username: &str, password: &str) -> AppResult<Option<User>> {
        let Some(user) = Self::gen_by_username(db, username).await? else {
            return Ok(None);
        };
        if security::verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn count_posts(db: &Database, user_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(user_id)
            .fetch_one(db.pool())
            .await?;
        Ok(count)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Full name when set, username otherwise.
    pub fn display_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }
}
