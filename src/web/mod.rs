// Web layer: routing table, templates and handlers

pub mod handlers;
pub mod templates;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::infrastructure::middleware::{error_page_middleware, viewer_context_middleware};
use handlers::{auth, comments, follow, pages, posts};

pub const SESSION_COOKIE_NAME: &str = "yatube-session";

pub fn create_router(state: AppState) -> Router {
    let use_secure_cookies = state.config.server.secure_cookies;
    if !use_secure_cookies {
        warn!("Secure cookies disabled - set SECURE_COOKIES=true when serving over HTTPS");
    }

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(use_secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true);

    let upload_limit = DefaultBodyLimit::max(state.config.site.max_upload_bytes);

    let mut router = Router::new()
        .route("/", get(posts::index))
        .route(
            "/new/",
            get(posts::new_post_form)
                .post(posts::new_post)
                .layer(upload_limit),
        )
        .route("/follow/", get(follow::follow_index))
        .route("/group/{slug}/", get(posts::group_posts))
        // Auth
        .route("/auth/signup/", get(auth::signup_form).post(auth::signup))
        .route("/auth/login/", get(auth::login_form).post(auth::login_submit))
        .route("/auth/logout/", get(auth::logout_view).post(auth::logout_view))
        // Flat pages
        .route("/about/{*url}", get(pages::flatpage))
        .route("/about-us/", get(pages::about_us))
        .route("/terms/", get(pages::terms))
        .route("/about-author/", get(pages::about_author))
        .route("/about-spec/", get(pages::about_spec))
        // Profiles and posts
        .route("/{username}/", get(posts::profile))
        .route("/{username}/follow/", get(follow::profile_follow))
        .route("/{username}/unfollow/", get(follow::profile_unfollow))
        .route("/{username}/{post_id}/", get(posts::post_view))
        .route(
            "/{username}/{post_id}/edit/",
            get(posts::post_edit_form)
                .post(posts::post_edit)
                .layer(upload_limit),
        )
        .route(
            "/{username}/{post_id}/delete/",
            get(posts::post_delete_confirm).post(posts::post_delete),
        )
        .route("/{username}/{post_id}/comment/", post(comments::add_comment))
        .route(
            "/{username}/{post_id}/comment/{comment_id}/edit/",
            get(comments::edit_comment_form).post(comments::edit_comment),
        )
        .route(
            "/{username}/{post_id}/comment/{comment_id}/delete/",
            get(comments::delete_comment).post(comments::delete_comment),
        );

    if state.config.site.debug {
        info!(
            "Serving /static from {} and /media from {}",
            state.config.site.static_root.display(),
            state.config.site.media_root.display()
        );
        router = router
            .nest_service("/static", ServeDir::new(&state.config.site.static_root))
            .nest_service("/media", ServeDir::new(&state.config.site.media_root));
    }

    // Outermost first. Error pages sit outside the viewer layer so failures
    // while resolving the viewer still get the HTML 500 page.
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("same-origin"),
        ))
        .layer(session_layer)
        .layer(from_fn(error_page_middleware))
        .layer(from_fn_with_state(state.clone(), viewer_context_middleware));

    router
        .fallback(pages::not_found)
        .layer(middleware)
        .with_state(state)
}
