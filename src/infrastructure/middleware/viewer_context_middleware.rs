// ViewerContext middleware - resolves the session user once per request and
// injects the viewer into request extensions. The viewer is copied onto the
// response too, for layers that only see the response.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::warn;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    entities::{Entity, User},
    error::AppResult,
    infrastructure::viewer::ViewerContext,
};

/// Session key holding the logged-in user's id.
pub const SESSION_USER_KEY: &str = "_auth_user_id";

pub async fn viewer_context_middleware(
    State(app_state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer_context = match create_viewer_context(&app_state, &session).await {
        Ok(vc) => vc,
        Err(err) => return err.into_response(),
    };

    request.extensions_mut().insert(viewer_context.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(viewer_context);
    response
}

async fn create_viewer_context(
    app_state: &AppState,
    session: &Session,
) -> AppResult<Arc<ViewerContext>> {
    let request_id = format!("req-{}", Uuid::new_v4());

    let Some(user_id) = session.get::<i64>(SESSION_USER_KEY).await? else {
        return Ok(Arc::new(ViewerContext::anonymous(request_id)));
    };

    match User::gen_nullable(&app_state.db, user_id).await? {
        Some(user) => Ok(Arc::new(ViewerContext::authenticated_user(user, request_id))),
        None => {
            // The account was deleted under a live session.
            warn!("Session points at missing user {}, logging out", user_id);
            session.flush().await?;
            Ok(Arc::new(ViewerContext::anonymous(request_id)))
        }
    }
}

/// Bind a user to the session, rotating the session id first.
pub async fn login(session: &Session, user: &User) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id).await?;
    Ok(())
}

pub async fn logout(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}
