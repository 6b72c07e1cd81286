// Entity layer - one module per table, shared lookup helpers on `Entity`

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;

/// Common lookups for every table-backed entity.
///
/// `SELECT` must be a full `SELECT ... FROM <table> t ...` statement with the
/// entity's own table aliased as `t`, so filters can be appended.
#[async_trait]
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Sized {
    const TABLE: &'static str;
    const NAME: &'static str;
    const SELECT: &'static str;

    async fn gen_nullable(db: &Database, id: i64) -> AppResult<Option<Self>> {
        let sql = format!("{} WHERE t.id = ?", Self::SELECT);
        let entity = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(db.pool())
            .await?;
        Ok(entity)
    }

    async fn gen_enforce(db: &Database, id: i64) -> AppResult<Self> {
        Self::gen_nullable(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} with id {} not found", Self::NAME, id)))
    }

    async fn delete(db: &Database, id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", Self::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(db.pool()).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_all(db: &Database) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", Self::TABLE);
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(db.pool()).await?;
        Ok(count)
    }
}

/// Escape `%`, `_` and the escape char itself for `LIKE ... ESCAPE '\'`.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub mod ent_comment;
pub mod ent_flatpage;
pub mod ent_follow;
pub mod ent_group;
pub mod ent_post;
pub mod ent_user;

pub use ent_comment::Comment;
pub use ent_flatpage::FlatPage;
pub use ent_follow::Follow;
pub use ent_group::Group;
pub use ent_post::{Post, PostFilter};
pub use ent_user::User;
