// ViewerContext extractors - hand the middleware-resolved viewer to handlers

use std::sync::Arc;
use crate::entities::User;
use crate::error::AppError;
use crate::infrastructure::viewer::ViewerContext;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

/// Cheap-to-clone handle on the current viewer, anonymous or not.
#[derive(Debug, Clone)]
pub struct Vc(Arc<ViewerContext>);

impl std::ops::Deref for Vc {
    type Target = ViewerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Vc
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let vc = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .map(|vc| Vc(vc.clone()))
            .ok_or_else(|| AppError::Internal("viewer context middleware not installed".to_string()));

        async move { vc }
    }
}

/// A logged-in viewer. Anonymous requests are rejected with a redirect to the
/// login page that returns to the requested path afterwards.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub vc: Vc,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let result = parts
            .extensions
            .get::<Arc<ViewerContext>>()
            .cloned()
            .ok_or_else(|| AppError::Internal("viewer context middleware not installed".to_string()))
            .and_then(|vc| match vc.user.clone() {
                Some(user) => Ok(AuthenticatedUser { user, vc: Vc(vc) }),
                None => Err(AppError::LoginRequired(next)),
            });

        async move { result }
    }
}
