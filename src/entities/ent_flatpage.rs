// FlatPage - static content pages stored in the database

use sqlx::FromRow;

use super::Entity;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;

#[derive(Debug, Clone, FromRow)]
pub struct FlatPage {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Pages every deployment starts with: (url, title, content).
pub const DEFAULT_PAGES: [(&str, &str, &str); 4] = [
    ("/about-us/", "About us", "Yatube is a place to share posts with the people who follow you."),
    ("/terms/", "Terms", "Be kind. Post only what you have the right to post."),
    ("/about-author/", "About the author", "This site is maintained by its author."),
    ("/about-spec/", "Technologies", "Rust, axum, sqlx, askama and SQLite."),
];

impl Entity for FlatPage {
    const TABLE: &'static str = "flatpages";
    const NAME: &'static str = "Flat page";
    const SELECT: &'static str = "SELECT t.id, t.url, t.title, t.content FROM flatpages t";
}

impl FlatPage {
    /// Flat page urls always start and end with a slash.
    pub fn normalize_url(url: &str) -> String {
        let trimmed = url.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        }
    }

    pub async fn gen_by_url(db: &Database, url: &str) -> AppResult<FlatPage> {
        let url = Self::normalize_url(url);
        let sql = format!("{} WHERE t.url = ?", Self::SELECT);
        sqlx::query_as::<_, FlatPage>(&sql)
            .bind(&url)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Flat page {} not found", url)))
    }

    /// Insert or replace the page at `url`.
    pub async fn upsert(db: &Database, url: &str, title: &str, content: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO flatpages (url, title, content) VALUES (?, ?, ?) \
             ON CONFLICT(url) DO UPDATE SET title = excluded.title, content = excluded.content",
        )
        .bind(Self::normalize_url(url))
        .bind(title)
        .bind(content)
        .execute(db.pool())
        .await?;
        Ok(())
    }

    /// Insert the default pages that are missing; existing ones are left alone.
    pub async fn seed_defaults(db: &Database) -> AppResult<u64> {
        let mut inserted = 0;
        for (url, title, content) in DEFAULT_PAGES {
            let result = sqlx::query("INSERT OR IGNORE INTO flatpages (url, title, content) VALUES (?, ?, ?)")
                .bind(url)
                .bind(title)
                .bind(content)
                .execute(db.pool())
                .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}
