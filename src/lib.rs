// Yatube - a small server-rendered social blog

// Core infrastructure - database, caches, media storage, request middleware
pub mod infrastructure;

// Table-backed entities
pub mod entities;

// Pagination and flash messages
pub mod framework;

// Form parsing and validation
pub mod forms;

// Routing, handlers and templates
pub mod web;

// Common utilities
pub mod app_state;
pub mod config;
pub mod data_seeder;
pub mod error;

// Re-exports for convenience
pub use app_state::AppState;
pub use error::{AppError, AppResult};
pub use web::create_router;
