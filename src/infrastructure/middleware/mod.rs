// Request middleware: viewer resolution, viewer extractors and HTML error pages

pub mod error_page_middleware;
pub mod viewer_context_extractor;
pub mod viewer_context_middleware;

pub use error_page_middleware::error_page_middleware;
pub use viewer_context_extractor::{AuthenticatedUser, Vc};
pub use viewer_context_middleware::*;
