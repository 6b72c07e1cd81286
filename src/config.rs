use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    /// Lifetime of a cached index page. Zero disables page caching.
    pub page_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub posts_per_page: i64,
    pub media_root: PathBuf,
    pub static_root: PathBuf,
    /// Serves `/static` and `/media` straight from disk.
    pub debug: bool,
    /// Body limit for the post create/edit forms, image included.
    pub max_upload_bytes: usize,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:yatube.db".to_string()),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: parse_var("SERVER_PORT", 8000),
                secure_cookies: flag_var("SECURE_COOKIES"),
            },
            cache: CacheConfig {
                capacity: parse_var("CACHE_CAPACITY", 1000),
                page_seconds: parse_var("PAGE_CACHE_SECONDS", 20),
            },
            site: SiteConfig {
                posts_per_page: parse_var("POSTS_PER_PAGE", 10).max(1),
                media_root: env::var("MEDIA_ROOT")
                    .unwrap_or_else(|_| "media".to_string())
                    .into(),
                static_root: env::var("STATIC_ROOT")
                    .unwrap_or_else(|_| "static".to_string())
                    .into(),
                debug: flag_var("DEBUG"),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
        })
    }

    /// In-memory configuration used by tests and throwaway runs.
    pub fn in_memory(media_root: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                secure_cookies: false,
            },
            cache: CacheConfig {
                capacity: 100,
                page_seconds: 20,
            },
            site: SiteConfig {
                posts_per_page: 10,
                media_root: media_root.into(),
                static_root: "static".into(),
                debug: true,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn flag_var(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_defaults() {
        let config = Config::in_memory("/tmp/media");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.site.posts_per_page, 10);
        assert_eq!(config.cache.page_seconds, 20);
        assert_eq!(config.site.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.server_address(), "127.0.0.1:0");
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        std::env::set_var("YATUBE_TEST_PORT", "not-a-number");
        assert_eq!(parse_var("YATUBE_TEST_PORT", 8000u16), 8000);
        std::env::set_var("YATUBE_TEST_PORT", "9001");
        assert_eq!(parse_var("YATUBE_TEST_PORT", 8000u16), 9001);
    }
}
