// Request handlers, one module per area of the site

pub mod auth;
pub mod comments;
pub mod follow;
pub mod pages;
pub mod posts;

use axum::response::Redirect;
use serde::Deserialize;

use crate::entities::{Follow, User};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;
use crate::infrastructure::ViewerContext;
use crate::web::templates::AuthorCard;

/// `?search=..&page=..` on the listing pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
}

/// Ids in the path that don't parse are simply unknown pages.
pub(crate) fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(format!("No object with id {:?}", raw)))
}

pub(crate) fn post_url(username: &str, post_id: i64) -> String {
    format!("/{}/{}/", username, post_id)
}

pub(crate) fn redirect_to_post(username: &str, post_id: i64) -> Redirect {
    Redirect::to(&post_url(username, post_id))
}

pub(crate) async fn author_card(db: &Database, vc: &ViewerContext, user: User) -> AppResult<AuthorCard> {
    let post_count = User::count_posts(db, user.id).await?;
    let followers = Follow::count_followers(db, user.id).await?;
    let following_count = Follow::count_following(db, user.id).await?;
    let following = match vc.user_id() {
        Some(viewer_id) => Follow::exists(db, viewer_id, user.id).await?,
        None => false,
    };

    Ok(AuthorCard {
        user,
        post_count,
        followers,
        following_count,
        following,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id("0"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id("-3"), Err(AppError::NotFound(_))));
    }
}
