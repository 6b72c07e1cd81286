// Follow - directed subscription edge user -> author

use sqlx::FromRow;
use tracing::info;

use super::Entity;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;

#[derive(Debug, Clone, FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
}

impl Entity for Follow {
    const TABLE: &'static str = "follows";
    const NAME: &'static str = "Follow";
    const SELECT: &'static str = "SELECT t.id, t.user_id, t.author_id FROM follows t";
}

impl Follow {
    /// Nobody can follow themselves. Checked here rather than in the schema.
    pub fn validate(user_id: i64, author_id: i64) -> AppResult<()> {
        if user_id == author_id {
            return Err(AppError::Validation("A user cannot follow themselves".to_string()));
        }
        Ok(())
    }

    /// Create the edge unless it already exists. Returns whether a row was
    /// inserted; concurrent duplicates are absorbed by the unique constraint.
    pub async fn get_or_create(db: &Database, user_id: i64, author_id: i64) -> AppResult<bool> {
        Self::validate(user_id, author_id)?;
        let result = sqlx::query("INSERT OR IGNORE INTO follows (user_id, author_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(author_id)
            .execute(db.pool())
            .await?;

        let created = result.rows_affected() > 0;
        if created {
            info!("User {} now follows {}", user_id, author_id);
        }
        Ok(created)
    }

    pub async fn delete_edge(db: &Database, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(db.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("User {} unfollowed {}", user_id, author_id);
        }
        Ok(deleted)
    }

    pub async fn exists(db: &Database, user_id: i64, author_id: i64) -> AppResult<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(db.pool())
        .await?;
        Ok(found != 0)
    }

    /// How many users follow `author_id`.
    pub async fn count_followers(db: &Database, author_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(db.pool())
            .await?;
        Ok(count)
    }

    /// How many authors `user_id` follows.
    pub async fn count_following(db: &Database, user_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(db.pool())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ent_user::NewUser;
    use crate::entities::User;

    async fn users(db: &Database) -> (User, User) {
        let mut created = Vec::new();
        for username in ["follower", "author"] {
            created.push(
                User::create(
                    db,
                    NewUser {
                        username,
                        password: "pw-pw-pw-pw",
                        ..Default::default()
                    },
                )
                .await
                .unwrap(),
            );
        }
        let author = created.pop().unwrap();
        let follower = created.pop().unwrap();
        (follower, author)
    }

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        let db = Database::new_in_memory().await.unwrap();
        let (follower, author) = users(&db).await;

        assert!(Follow::get_or_create(&db, follower.id, author.id).await.unwrap());
        assert!(!Follow::get_or_create(&db, follower.id, author.id).await.unwrap());
        assert_eq!(Follow::count_followers(&db, author.id).await.unwrap(), 1);
        assert_eq!(Follow::count_following(&db, follower.id).await.unwrap(), 1);
        assert!(Follow::exists(&db, follower.id, author.id).await.unwrap());
        assert!(!Follow::exists(&db, author.id, follower.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_self_follow_rejected() {
        let db = Database::new_in_memory().await.unwrap();
        let (follower, _) = users(&db).await;
        assert!(matches!(
            Follow::get_or_create(&db, follower.id, follower.id).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(Follow::count_all(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unfollow() {
        let db = Database::new_in_memory().await.unwrap();
        let (follower, author) = users(&db).await;
        Follow::get_or_create(&db, follower.id, author.id).await.unwrap();

        assert!(Follow::delete_edge(&db, follower.id, author.id).await.unwrap());
        assert!(!Follow::delete_edge(&db, follower.id, author.id).await.unwrap());
        assert_eq!(Follow::count_followers(&db, author.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edges_cascade_with_user() {
        let db = Database::new_in_memory().await.unwrap();
        let (follower, author) = users(&db).await;
        Follow::get_or_create(&db, follower.id, author.id).await.unwrap();
        User::delete(&db, author.id).await.unwrap();
        assert_eq!(Follow::count_all(&db).await.unwrap(), 0);
    }
}
