use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{
    config::Config,
    entities::FlatPage,
    infrastructure::{Database, FileSystemMediaStore, MediaStore, PageCache},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub page_cache: PageCache,
    pub media: Arc<dyn MediaStore>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize database
        let db = Database::connect(&config.database.url).await?;
        db.init().await?;

        let seeded = FlatPage::seed_defaults(&db).await?;
        if seeded > 0 {
            info!("Seeded {} flat pages", seeded);
        }

        let page_cache = PageCache::new(
            config.cache.capacity,
            Duration::from_secs(config.cache.page_seconds),
        );
        let media: Arc<dyn MediaStore> =
            Arc::new(FileSystemMediaStore::new(config.site.media_root.clone()));

        Ok(Self {
            db,
            page_cache,
            media,
            config,
        })
    }

    pub fn posts_per_page(&self) -> i64 {
        self.config.site.posts_per_page
    }
}
