// Group - named category a post may be filed under

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::FromRow;
use tracing::info;

use super::Entity;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

pub const TITLE_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Entity for Group {
    const TABLE: &'static str = "post_groups";
    const NAME: &'static str = "Group";
    const SELECT: &'static str = "SELECT t.id, t.title, t.slug, t.description FROM post_groups t";
}

impl Group {
    pub fn is_valid_slug(slug: &str) -> bool {
        SLUG_RE.is_match(slug)
    }

    /// Lowercase ASCII slug derived from a title, for callers that only
    /// have a title to go on.
    pub fn slugify(title: &str) -> String {
        let mut slug = String::new();
        for c in title.trim().chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                slug.push(c.to_ascii_lowercase());
            } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_matches('-').to_string()
    }

    pub async fn create(db: &Database, title: &str, slug: &str, description: &str) -> AppResult<Group> {
        if title.trim().is_empty() || title.chars().count() > TITLE_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "Group title must be 1..={} characters",
                TITLE_MAX_LENGTH
            )));
        }
        if !Self::is_valid_slug(slug) {
            return Err(AppError::Validation(format!(
                "Slug {:?} may only contain letters, numbers, underscores or hyphens",
                slug
            )));
        }

        let result = sqlx::query("INSERT INTO post_groups (title, slug, description) VALUES (?, ?, ?)")
            .bind(title)
            .bind(slug)
            .bind(description)
            .execute(db.pool())
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::Validation(format!("Group with slug {} already exists", slug));
                    }
                }
                AppError::from(e)
            })?;

        info!("Created group {} (ID: {})", slug, result.last_insert_rowid());
        Self::gen_enforce(db, result.last_insert_rowid()).await
    }

    pub async fn gen_by_slug(db: &Database, slug: &str) -> AppResult<Option<Group>> {
        let sql = format!("{} WHERE t.slug = ?", Self::SELECT);
        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(slug)
            .fetch_optional(db.pool())
            .await?;
        Ok(group)
    }

    pub async fn gen_by_slug_enforce(db: &Database, slug: &str) -> AppResult<Group> {
        Self::gen_by_slug(db, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", slug)))
    }

    /// All groups by title, for the post form's group choices.
    pub async fn list_all(db: &Database) -> AppResult<Vec<Group>> {
        let sql = format!("{} ORDER BY t.title, t.id", Self::SELECT);
        let groups = sqlx::query_as::<_, Group>(&sql).fetch_all(db.pool()).await?;
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(Group::is_valid_slug("cats_and-dogs1"));
        assert!(!Group::is_valid_slug("cats and dogs"));
        assert!(!Group::is_valid_slug(""));
        assert_eq!(Group::slugify("  Cats & Dogs - 2024 "), "cats-dogs-2024");
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_slug() {
        let db = Database::new_in_memory().await.unwrap();
        let group = Group::create(&db, "Cats", "cats", "About cats").await.unwrap();

        let found = Group::gen_by_slug(&db, "cats").await.unwrap().unwrap();
        assert_eq!(found.id, group.id);
        assert!(Group::gen_by_slug(&db, "dogs").await.unwrap().is_none());
        assert!(matches!(
            Group::gen_by_slug_enforce(&db, "dogs").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_slug_is_unique() {
        let db = Database::new_in_memory().await.unwrap();
        Group::create(&db, "Cats", "cats", "").await.unwrap();
        assert!(matches!(
            Group::create(&db, "Other cats", "cats", "").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let db = Database::new_in_memory().await.unwrap();
        assert!(Group::create(&db, "Cats", "no spaces", "").await.is_err());
        let long_title = "x".repeat(TITLE_MAX_LENGTH + 1);
        assert!(Group::create(&db, &long_title, "long", "").await.is_err());
        assert_eq!(Group::list_all(&db).await.unwrap().len(), 0);
    }
}
