// Comment add/edit/delete; all of them land back on the post page

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;
use tracing::{info, warn};

use super::{author_card, parse_id, post_url, redirect_to_post};
use crate::app_state::AppState;
use crate::entities::{Comment, Entity, Post, User};
use crate::error::AppResult;
use crate::forms::CommentForm;
use crate::framework::{flash, Level};
use crate::infrastructure::middleware::AuthenticatedUser;
use crate::infrastructure::ViewerContext;
use crate::web::templates::{render, PageContext, PostTemplate};

pub async fn add_comment(
    State(state): State<AppState>,
    AuthenticatedUser { user, .. }: AuthenticatedUser,
    session: Session,
    Path((username, post_id)): Path<(String, String)>,
    Form(mut form): Form<CommentForm>,
) -> AppResult<Redirect> {
    let post = Post::gen_for_author(&state.db, &username, parse_id(&post_id)?).await?;

    // An empty comment is dropped silently, the post page shows no error.
    if let Some(text) = form.clean() {
        Comment::create(&state.db, post.id, user.id, &text).await?;
        flash::push(&session, Level::Warning, "Comment added").await?;
    }
    Ok(redirect_to_post(&post.author_username, post.id))
}

async fn owned_comment(
    state: &AppState,
    vc: &ViewerContext,
    username: &str,
    post_id: &str,
    comment_id: &str,
) -> AppResult<Result<(Post, Comment), Redirect>> {
    let post_id = parse_id(post_id)?;
    let comment = Comment::gen_for_post(&state.db, username, post_id, parse_id(comment_id)?).await?;
    let post = Post::gen_enforce(&state.db, post_id).await?;
    if !vc.is_owner(comment.author_id) {
        warn!(
            "User {} tried to change comment {} of {}",
            vc.username().unwrap_or_default(),
            comment.id,
            comment.author_username
        );
        return Ok(Err(redirect_to_post(&post.author_username, post.id)));
    }
    Ok(Ok((post, comment)))
}

pub async fn edit_comment_form(
    State(state): State<AppState>,
    AuthenticatedUser { vc, .. }: AuthenticatedUser,
    session: Session,
    Path((username, post_id, comment_id)): Path<(String, String, String)>,
) -> AppResult<Response> {
    let (post, comment) = match owned_comment(&state, &vc, &username, &post_id, &comment_id).await? {
        Ok(found) => found,
        Err(redirect) => return Ok(redirect.into_response()),
    };
    let form = CommentForm::with_text(comment.text.clone());
    render_edit_page(&state, &vc, &session, post, &comment, form).await
}

pub async fn edit_comment(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    Path((username, post_id, comment_id)): Path<(String, String, String)>,
    Form(mut form): Form<CommentForm>,
) -> AppResult<Response> {
    let (post, comment) = match owned_comment(&state, &vc, &username, &post_id, &comment_id).await? {
        Ok(found) => found,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    match form.clean() {
        Some(text) => {
            Comment::update_text(&state.db, comment.id, &text).await?;
            info!("Comment {} edited by {}", comment.id, user.username);
            flash::push(&session, Level::Success, "Comment updated").await?;
            Ok(redirect_to_post(&post.author_username, post.id).into_response())
        }
        None => render_edit_page(&state, &vc, &session, post, &comment, form).await,
    }
}

async fn render_edit_page(
    state: &AppState,
    vc: &ViewerContext,
    session: &Session,
    post: Post,
    comment: &Comment,
    form: CommentForm,
) -> AppResult<Response> {
    let author = User::gen_enforce(&state.db, post.author_id).await?;
    let form_action = format!(
        "{}comment/{}/edit/",
        post_url(&post.author_username, post.id),
        comment.id
    );

    Ok(render(&PostTemplate {
        ctx: PageContext::load(vc, session).await?,
        author: author_card(&state.db, vc, author).await?,
        post,
        comments: Vec::new(),
        form,
        editing: true,
        form_action,
    })?
    .into_response())
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    Path((username, post_id, comment_id)): Path<(String, String, String)>,
) -> AppResult<Redirect> {
    let (post, comment) = match owned_comment(&state, &vc, &username, &post_id, &comment_id).await? {
        Ok(found) => found,
        Err(redirect) => return Ok(redirect),
    };

    Comment::delete(&state.db, comment.id).await?;
    info!("Comment {} deleted by {}", comment.id, user.username);
    flash::push(&session, Level::Warning, "Comment deleted").await?;
    Ok(redirect_to_post(&post.author_username, post.id))
}
