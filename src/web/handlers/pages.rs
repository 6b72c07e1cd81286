// Flat pages and the catch-all 404

use axum::{
    extract::{Path, State},
    http::Uri,
    response::Html,
};
use tower_sessions::Session;

use crate::app_state::AppState;
use crate::entities::FlatPage;
use crate::error::{AppError, AppResult};
use crate::infrastructure::middleware::Vc;
use crate::web::templates::{render, FlatPageTemplate, PageContext};

async fn render_flatpage(state: &AppState, vc: &Vc, session: &Session, url: &str) -> AppResult<Html<String>> {
    let page = FlatPage::gen_by_url(&state.db, url).await?;
    render(&FlatPageTemplate {
        ctx: PageContext::load(vc, session).await?,
        page,
    })
}

/// `/about/<url>` serves any stored flat page by its url.
pub async fn flatpage(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    Path(url): Path<String>,
) -> AppResult<Html<String>> {
    render_flatpage(&state, &vc, &session, &url).await
}

pub async fn about_us(State(state): State<AppState>, vc: Vc, session: Session) -> AppResult<Html<String>> {
    render_flatpage(&state, &vc, &session, "/about-us/").await
}

pub async fn terms(State(state): State<AppState>, vc: Vc, session: Session) -> AppResult<Html<String>> {
    render_flatpage(&state, &vc, &session, "/terms/").await
}

pub async fn about_author(State(state): State<AppState>, vc: Vc, session: Session) -> AppResult<Html<String>> {
    render_flatpage(&state, &vc, &session, "/about-author/").await
}

pub async fn about_spec(State(state): State<AppState>, vc: Vc, session: Session) -> AppResult<Html<String>> {
    render_flatpage(&state, &vc, &session, "/about-spec/").await
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
