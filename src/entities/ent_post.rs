// Post - the core content entity; everything else hangs off it

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::info;

use super::{like_pattern, Entity};
use crate::error::{AppError, AppResult};
use crate::framework::pagination::{Page, Paginator};
use crate::infrastructure::database::Database;

/// A post row joined with the author and group columns every listing shows.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub comment_count: i64,
}

/// Editable fields; `pub_date` and `author_id` are fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// Row filter shared by the index, group, profile and follow listings.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub group_id: Option<i64>,
    pub author_id: Option<i64>,
    /// Only posts by authors this user follows.
    pub followed_by: Option<i64>,
}

impl PostFilter {
    pub fn search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }

    pub fn group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn followed_by(mut self, user_id: i64) -> Self {
        self.followed_by = Some(user_id);
        self
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");
        if let Some(search) = &self.search {
            qb.push(" AND t.text LIKE ");
            qb.push_bind(like_pattern(search));
            qb.push(" ESCAPE '\\'");
        }
        if let Some(group_id) = self.group_id {
            qb.push(" AND t.group_id = ");
            qb.push_bind(group_id);
        }
        if let Some(author_id) = self.author_id {
            qb.push(" AND t.author_id = ");
            qb.push_bind(author_id);
        }
        if let Some(user_id) = self.followed_by {
            qb.push(" AND t.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ");
            qb.push_bind(user_id);
            qb.push(")");
        }
    }
}

impl Entity for Post {
    const TABLE: &'static str = "posts";
    const NAME: &'static str = "Post";
    const SELECT: &'static str = "SELECT t.id, t.text, t.pub_date, t.author_id, \
         u.username AS author_username, t.group_id, g.slug AS group_slug, \
         g.title AS group_title, t.image, \
         (SELECT COUNT(*) FROM comments c WHERE c.post_id = t.id) AS comment_count \
         FROM posts t \
         JOIN users u ON u.id = t.author_id \
         LEFT JOIN post_groups g ON g.id = t.group_id";
}

impl Post {
    pub async fn create(db: &Database, author_id: i64, fields: &PostFields) -> AppResult<Post> {
        let result = sqlx::query(
            "INSERT INTO posts (text, pub_date, author_id, group_id, image) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&fields.text)
        .bind(Utc::now())
        .bind(author_id)
        .bind(fields.group_id)
        .bind(&fields.image)
        .execute(db.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!("Created post {} by user {}", id, author_id);
        Self::gen_enforce(db, id).await
    }

    pub async fn update(db: &Database, id: i64, fields: &PostFields) -> AppResult<Post> {
        let result = sqlx::query("UPDATE posts SET text = ?, group_id = ?, image = ? WHERE id = ?")
            .bind(&fields.text)
            .bind(fields.group_id)
            .bind(&fields.image)
            .bind(id)
            .execute(db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }
        info!("Updated post {}", id);
        Self::gen_enforce(db, id).await
    }

    /// The post `post_id`, but only when it was written by `username`.
    pub async fn gen_for_author(db: &Database, username: &str, post_id: i64) -> AppResult<Post> {
        let sql = format!("{} WHERE t.id = ? AND u.username = ?", Self::SELECT);
        sqlx::query_as::<_, Post>(&sql)
            .bind(post_id)
            .bind(username)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} by {} not found", post_id, username)))
    }

    pub async fn count(db: &Database, filter: &PostFilter) -> AppResult<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts t");
        filter.push_conditions(&mut qb);
        let count = qb.build_query_scalar::<i64>().fetch_one(db.pool()).await?;
        Ok(count)
    }

    /// Newest-first page of posts matching `filter`.
    pub async fn page(
        db: &Database,
        filter: &PostFilter,
        raw_page: Option<&str>,
        per_page: i64,
    ) -> AppResult<Page<Post>> {
        let paginator = Paginator::new(Self::count(db, filter).await?, per_page);
        let number = paginator.get_page(raw_page);

        let mut qb = QueryBuilder::<Sqlite>::new(Self::SELECT);
        filter.push_conditions(&mut qb);
        qb.push(" ORDER BY t.pub_date DESC, t.id DESC LIMIT ");
        qb.push_bind(paginator.per_page());
        qb.push(" OFFSET ");
        qb.push_bind(paginator.offset(number));

        let items = qb.build_query_as::<Post>().fetch_all(db.pool()).await?;
        Ok(Page::new(items, number, &paginator))
    }

    pub async fn list(
        db: &Database,
        search: Option<&str>,
        raw_page: Option<&str>,
        per_page: i64,
    ) -> AppResult<Page<Post>> {
        Self::page(db, &PostFilter::default().search(search), raw_page, per_page).await
    }

    pub async fn list_for_group(
        db: &Database,
        group_id: i64,
        search: Option<&str>,
        raw_page: Option<&str>,
        per_page: i64,
    ) -> AppResult<Page<Post>> {
        let filter = PostFilter::default().group(group_id).search(search);
        Self::page(db, &filter, raw_page, per_page).await
    }

    pub async fn list_for_author(
        db: &Database,
        author_id: i64,
        raw_page: Option<&str>,
        per_page: i64,
    ) -> AppResult<Page<Post>> {
        Self::page(db, &PostFilter::default().author(author_id), raw_page, per_page).await
    }

    pub async fn list_feed(
        db: &Database,
        viewer_id: i64,
        search: Option<&str>,
        raw_page: Option<&str>,
        per_page: i64,
    ) -> AppResult<Page<Post>> {
        let filter = PostFilter::default().followed_by(viewer_id).search(search);
        Self::page(db, &filter, raw_page, per_page).await
    }

    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}
