use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(anyhow::Error),
    DatabaseError(String),
    NotFound(String),
    /// Anonymous access to a login-only page; carries the path to return to.
    LoginRequired(String),
    BadRequest(String),
    Validation(String),
    Template(String),
    Session(String),
    Media(String),
    Internal(String),
}

/// Marker left on error responses so the error-page layer can render the
/// matching HTML page with the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    NotFound,
    ServerError,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::LoginRequired(next) => write!(f, "Login required for {}", next),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Template(msg) => write!(f, "Template error: {}", msg),
            AppError::Session(msg) => write!(f, "Session error: {}", msg),
            AppError::Media(msg) => write!(f, "Media error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn login_url(next: &str) -> String {
        format!("/auth/login/?next={}", urlencoding::encode(next))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, page) = match &self {
            AppError::LoginRequired(next) => {
                return Redirect::to(&Self::login_url(next)).into_response();
            }
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorPage::NotFound)
            }
            AppError::BadRequest(msg) | AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                return (StatusCode::BAD_REQUEST, msg.clone()).into_response();
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorPage::ServerError)
            }
            AppError::DatabaseError(msg)
            | AppError::Template(msg)
            | AppError::Session(msg)
            | AppError::Media(msg)
            | AppError::Internal(msg) => {
                tracing::error!("{}: {}", status_label(&self), msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorPage::ServerError)
            }
        };

        let mut response = (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            status.canonical_reason().unwrap_or("Error"),
        )
            .into_response();
        response.extensions_mut().insert(page);
        response
    }
}

fn status_label(err: &AppError) -> &'static str {
    match err {
        AppError::Template(_) => "Template error",
        AppError::Session(_) => "Session error",
        AppError::Media(_) => "Media error",
        AppError::DatabaseError(_) => "Database error",
        _ => "Internal error",
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Template(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Media(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
