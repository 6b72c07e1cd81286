// Error page middleware - swaps bare 404/500 responses for the site's HTML
// error pages. Runs outside the viewer middleware, which leaves the viewer on
// the response; a response without one renders for an anonymous visitor.

use askama::Template;
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::error::ErrorPage;
use crate::infrastructure::viewer::ViewerContext;
use crate::web::templates::{NotFoundTemplate, PageContext, ServerErrorTemplate};

pub async fn error_page_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let Some(page) = response.extensions().get::<ErrorPage>().copied() else {
        return response;
    };
    let ctx = response
        .extensions()
        .get::<Arc<ViewerContext>>()
        .map(|vc| PageContext::from_viewer(vc))
        .unwrap_or_default();

    let rendered = match page {
        ErrorPage::NotFound => NotFoundTemplate { ctx, path }.render(),
        ErrorPage::ServerError => ServerErrorTemplate { ctx }.render(),
    };

    match rendered {
        Ok(body) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, axum::body::Body::from(body))
        }
        Err(err) => {
            // Keep the plain-text body the handler produced.
            error!("Failed to render error page: {}", err);
            response.into_response()
        }
    }
}
