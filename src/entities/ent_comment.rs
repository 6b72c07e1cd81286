// Comment - reply attached to exactly one post

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;

use super::Entity;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Entity for Comment {
    const TABLE: &'static str = "comments";
    const NAME: &'static str = "Comment";
    const SELECT: &'static str = "SELECT t.id, t.post_id, t.author_id, \
         u.username AS author_username, t.text, t.created \
         FROM comments t JOIN users u ON u.id = t.author_id";
}

impl Comment {
    pub async fn create(db: &Database, post_id: i64, author_id: i64, text: &str) -> AppResult<Comment> {
        let result = sqlx::query("INSERT INTO comments (post_id, author_id, text, created) VALUES (?, ?, ?, ?)")
            .bind(post_id)
            .bind(author_id)
            .bind(text)
            .bind(Utc::now())
            .execute(db.pool())
            .await?;

        let id = result.last_insert_rowid();
        info!("User {} commented on post {} (comment {})", author_id, post_id, id);
        Self::gen_enforce(db, id).await
    }

    pub async fn update_text(db: &Database, id: i64, text: &str) -> AppResult<Comment> {
        let result = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }
        Self::gen_enforce(db, id).await
    }

    /// Newest-first comments of a post.
    pub async fn list_for_post(db: &Database, post_id: i64) -> AppResult<Vec<Comment>> {
        let sql = format!("{} WHERE t.post_id = ? ORDER BY t.created DESC, t.id DESC", Self::SELECT);
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(post_id)
            .fetch_all(db.pool())
            .await?;
        Ok(comments)
    }

    /// The comment `comment_id`, but only on post `post_id` written by `username`.
    pub async fn gen_for_post(
        db: &Database,
        username: &str,
        post_id: i64,
        comment_id: i64,
    ) -> AppResult<Comment> {
        let sql = format!(
            "{} JOIN posts p ON p.id = t.post_id JOIN users pa ON pa.id = p.author_id \
             WHERE t.id = ? AND p.id = ? AND pa.username = ?",
            Self::SELECT
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(comment_id)
            .bind(post_id)
            .bind(username)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} on post {} not found", comment_id, post_id)))
    }
}
