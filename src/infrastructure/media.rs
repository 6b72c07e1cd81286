// Media storage for uploaded post images

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Where uploaded files end up. Paths handed back are relative to the media
/// root and are what gets stored on the post row.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn save(&self, upload_to: &str, extension: &str, data: &[u8]) -> AppResult<String>;
    async fn exists(&self, relative_path: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct FileSystemMediaStore {
    root: PathBuf,
}

impl FileSystemMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for FileSystemMediaStore {
    async fn save(&self, upload_to: &str, extension: &str, data: &[u8]) -> AppResult<String> {
        if upload_to.contains("..") || extension.contains(['/', '\\', '.']) {
            return Err(AppError::Media(format!(
                "Refusing to store {}/*.{}",
                upload_to, extension
            )));
        }

        let dir = self.root.join(upload_to);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        tokio::fs::write(dir.join(&file_name), data).await?;

        let relative = format!("{}/{}", upload_to.trim_end_matches('/'), file_name);
        info!("Stored upload {} ({} bytes)", relative, data.len());
        Ok(relative)
    }

    async fn exists(&self, relative_path: &str) -> bool {
        tokio::fs::try_exists(self.root.join(relative_path))
            .await
            .unwrap_or(false)
    }
}
