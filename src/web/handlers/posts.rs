// Post listings, detail page and the create/edit/delete flows

use axum::{
    extract::{Multipart, Path, Query, State},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};
use askama::Template;
use tower_sessions::Session;
use tracing::{debug, info, warn};

use super::{author_card, parse_id, post_url, redirect_to_post, ListParams};
use crate::app_state::AppState;
use crate::entities::ent_post::PostFields;
use crate::entities::{Comment, Entity, Group, Post, User};
use crate::error::AppResult;
use crate::forms::post_form::IMAGE_UPLOAD_TO;
use crate::forms::{CleanedPost, CommentForm, PostForm};
use crate::infrastructure::middleware::{AuthenticatedUser, Vc};
use crate::web::templates::{
    render, GroupTemplate, IndexTemplate, PageContext, PostDeleteTemplate, PostFormTemplate,
    PostTemplate, ProfileTemplate, SearchState,
};

/// Front page. Whole rendered pages are cached per viewer and URI.
pub async fn index(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    uri: Uri,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let cache_key = format!("{}:{}", vc.user_id().unwrap_or(0), uri);
    if let Some(body) = state.page_cache.get(&cache_key).await {
        debug!("Index served from cache: {}", cache_key);
        return Ok(Html(body).into_response());
    }

    let search = SearchState::new(params.search.as_deref());
    let page = Post::list(
        &state.db,
        search.as_option(),
        params.page.as_deref(),
        state.posts_per_page(),
    )
    .await?;

    let ctx = PageContext::load(&vc, &session).await?;
    // Flash messages are one-shot; never freeze them into the cache.
    let cacheable = !ctx.has_messages();
    let body = IndexTemplate { ctx, page, search }.render()?;
    if cacheable {
        state.page_cache.insert(cache_key, body.clone()).await;
    }
    Ok(Html(body).into_response())
}

pub async fn group_posts(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Html<String>> {
    let group = Group::gen_by_slug_enforce(&state.db, &slug).await?;
    let search = SearchState::new(params.search.as_deref());
    let page = Post::list_for_group(
        &state.db,
        group.id,
        search.as_option(),
        params.page.as_deref(),
        state.posts_per_page(),
    )
    .await?;

    render(&GroupTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        group,
        page,
        search,
    })
}

pub async fn profile(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    Path(username): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Html<String>> {
    let user = User::gen_by_username_enforce(&state.db, &username).await?;
    let page = Post::list_for_author(
        &state.db,
        user.id,
        params.page.as_deref(),
        state.posts_per_page(),
    )
    .await?;

    render(&ProfileTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        author: author_card(&state.db, &vc, user).await?,
        page,
        search: SearchState::default(),
    })
}

pub async fn post_view(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let post = Post::gen_for_author(&state.db, &username, parse_id(&post_id)?).await?;
    let author = User::gen_enforce(&state.db, post.author_id).await?;
    let comments = Comment::list_for_post(&state.db, post.id).await?;
    let form_action = format!("{}comment/", post_url(&post.author_username, post.id));

    render(&PostTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        author: author_card(&state.db, &vc, author).await?,
        post,
        comments,
        form: CommentForm::default(),
        editing: false,
        form_action,
    })
}

async fn post_form_page(
    state: &AppState,
    ctx: PageContext,
    form: PostForm,
    editing: Option<&Post>,
) -> AppResult<Html<String>> {
    let groups = form.group_choices(&Group::list_all(&state.db).await?);
    let (form_action, current_image) = match editing {
        Some(post) => (
            format!("{}edit/", post_url(&post.author_username, post.id)),
            post.image.clone().unwrap_or_default(),
        ),
        None => ("/new/".to_string(), String::new()),
    };

    render(&PostFormTemplate {
        ctx,
        form,
        groups,
        editing: editing.is_some(),
        form_action,
        current_image,
    })
}

/// Store the uploaded image, if any, and work out what the post's image
/// column should hold afterwards.
async fn resolve_image(state: &AppState, cleaned: &CleanedPost, current: Option<String>) -> AppResult<Option<String>> {
    if let Some(image) = &cleaned.image {
        let path = state
            .media
            .save(IMAGE_UPLOAD_TO, image.extension, &image.data)
            .await?;
        return Ok(Some(path));
    }
    if cleaned.clear_image {
        return Ok(None);
    }
    Ok(current)
}

pub async fn new_post_form(
    State(state): State<AppState>,
    AuthenticatedUser { vc, .. }: AuthenticatedUser,
    session: Session,
) -> AppResult<Html<String>> {
    let ctx = PageContext::load(&vc, &session).await?;
    post_form_page(&state, ctx, PostForm::default(), None).await
}

pub async fn new_post(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = PostForm::from_multipart(multipart).await?;
    let Some(cleaned) = form.clean(&state.db).await? else {
        let ctx = PageContext::load(&vc, &session).await?;
        return Ok(post_form_page(&state, ctx, form, None).await?.into_response());
    };

    let image = resolve_image(&state, &cleaned, None).await?;
    let fields = PostFields {
        text: cleaned.text,
        group_id: cleaned.group_id,
        image,
    };
    let post = Post::create(&state.db, user.id, &fields).await?;
    info!("Post {} published by {}", post.id, user.username);
    Ok(Redirect::to("/").into_response())
}

pub async fn post_edit_form(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let post = Post::gen_for_author(&state.db, &username, parse_id(&post_id)?).await?;
    if !post.is_authored_by(user.id) {
        return Ok(redirect_to_post(&post.author_username, post.id).into_response());
    }

    let ctx = PageContext::load(&vc, &session).await?;
    let form = PostForm::from_post(&post);
    Ok(post_form_page(&state, ctx, form, Some(&post)).await?.into_response())
}

pub async fn post_edit(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    Path((username, post_id)): Path<(String, String)>,
    multipart: Multipart,
) -> AppResult<Response> {
    let post = Post::gen_for_author(&state.db, &username, parse_id(&post_id)?).await?;
    if !post.is_authored_by(user.id) {
        warn!("User {} tried to edit post {} of {}", user.username, post.id, post.author_username);
        return Ok(redirect_to_post(&post.author_username, post.id).into_response());
    }

    let mut form = PostForm::from_multipart(multipart).await?;
    let Some(cleaned) = form.clean(&state.db).await? else {
        let ctx = PageContext::load(&vc, &session).await?;
        return Ok(post_form_page(&state, ctx, form, Some(&post)).await?.into_response());
    };

    let image = resolve_image(&state, &cleaned, post.image.clone()).await?;
    let fields = PostFields {
        text: cleaned.text,
        group_id: cleaned.group_id,
        image,
    };
    let updated = Post::update(&state.db, post.id, &fields).await?;
    info!("Post {} edited by {}", updated.id, user.username);
    Ok(redirect_to_post(&updated.author_username, updated.id).into_response())
}

pub async fn post_delete_confirm(
    State(state): State<AppState>,
    AuthenticatedUser { user, vc }: AuthenticatedUser,
    session: Session,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let post = Post::gen_for_author(&state.db, &username, parse_id(&post_id)?).await?;
    if !post.is_authored_by(user.id) {
        return Ok(redirect_to_post(&post.author_username, post.id).into_response());
    }

    Ok(render(&PostDeleteTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        post,
    })?
    .into_response())
}

pub async fn post_delete(
    State(state): State<AppState>,
    AuthenticatedUser { user, .. }: AuthenticatedUser,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Redirect> {
    let post = Post::gen_for_author(&state.db, &username, parse_id(&post_id)?).await?;
    if !post.is_authored_by(user.id) {
        warn!("User {} tried to delete post {} of {}", user.username, post.id, post.author_username);
        return Ok(redirect_to_post(&post.author_username, post.id));
    }

    Post::delete(&state.db, post.id).await?;
    info!("Post {} deleted by {}", post.id, user.username);
    Ok(Redirect::to("/"))
}
