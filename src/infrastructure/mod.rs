// Core infrastructure modules
pub mod cache;                 // LRU + page cache
pub mod database;              // SQLite pool and schema
pub mod media;                 // Uploaded file storage
pub mod middleware;            // Viewer resolution per request
pub mod security;              // Password hashing
pub mod viewer;                // Viewer context

pub use cache::{Cache, PageCache};
pub use database::Database;
pub use media::{FileSystemMediaStore, MediaStore};
pub use viewer::ViewerContext;
