// Following authors and the personal feed built from those edges

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use tower_sessions::Session;
use tracing::debug;

use super::ListParams;
use crate::app_state::AppState;
use crate::entities::{Follow, Post, User};
use crate::error::AppResult;
use crate::infrastructure::middleware::AuthenticatedUser;
use crate::web::templates::{render, FollowTemplate, PageContext, SearchState};

pub async fn follow_index(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    Query(params): Query<ListParams>,
) -> AppResult<Html<String>> {
    let search = SearchState::new(params.search.as_deref());
    let page = Post::list_feed(
        &state.db,
        user.id,
        search.as_option(),
        params.page.as_deref(),
        state.posts_per_page(),
    )
    .await?;

    render(&FollowTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        page,
        search,
    })
}

fn profile_redirect(username: &str) -> Redirect {
    Redirect::to(&format!("/{}/", username))
}

pub async fn profile_follow(
    State(state): State<AppState>,
    AuthenticatedUser { user, .. }: AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = User::gen_by_username_enforce(&state.db, &username).await?;
    if author.id == user.id {
        debug!("{} tried to follow themselves", user.username);
    } else {
        Follow::get_or_create(&state.db, user.id, author.id).await?;
    }
    Ok(profile_redirect(&author.username))
}

pub async fn profile_unfollow(
    State(state): State<AppState>,
    AuthenticatedUser { user, .. }: AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = User::gen_by_username_enforce(&state.db, &username).await?;
    if author.id != user.id {
        Follow::delete_edge(&state.db, user.id, author.id).await?;
    }
    Ok(profile_redirect(&author.username))
}
