use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::error::{AppError, AppResult};

/// SQLite-backed store for every yatube table.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Invalid database url {}: {}", database_url, e))
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens a fresh database, so keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to {}: {}", database_url, e))
        })?;

        info!("Connected to database at {}", database_url);
        Ok(Self { pool })
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        let db = Self::connect("sqlite::memory:").await?;
        db.init().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they are missing.
    pub async fn init(&self) -> AppResult<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                password_hash TEXT NOT NULL,
                date_joined TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS post_groups (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK (length(title) <= 200),
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                pub_date TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                group_id INTEGER REFERENCES post_groups(id) ON DELETE SET NULL,
                image TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                created TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS follows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                CONSTRAINT unique_followers UNIQUE (user_id, author_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS flatpages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                content TEXT NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_posts_pub_date ON posts(pub_date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id, pub_date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_posts_group ON posts(group_id, pub_date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, created DESC)",
            "CREATE INDEX IF NOT EXISTS idx_follows_author ON follows(author_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to create schema: {}", e)))?;
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
