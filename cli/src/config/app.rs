use super::{LoggingConfig, limits::*, validation::ConfigValidationError};
use engine::cache::DEFAULT_TTL;
use engine::content::DEFAULT_CONTENT_ROOT;
use engine::{ContentLocator, EngineSettings, FileStore};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    content_root: Option<String>,
    cache_dir: Option<PathBuf>,
    cache_ttl_seconds: Option<u64>,
    max_concurrent_fetches: Option<usize>,
    request_timeout_secs: Option<u64>,

    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let root = self.content_root();
        if !(root.starts_with("https://") || root.starts_with("http://")) {
            errors.push(ConfigValidationError::ContentRoot {
                configured: root.to_string(),
            });
        }

        let ttl = self.cache_ttl_seconds();
        if !(MIN_CACHE_TTL_SECONDS..=MAX_CACHE_TTL_SECONDS).contains(&ttl) {
            errors.push(ConfigValidationError::CacheTtl {
                configured: ttl,
                min_limit: MIN_CACHE_TTL_SECONDS,
                max_limit: MAX_CACHE_TTL_SECONDS,
            });
        }

        let fetches = self.max_concurrent_fetches();
        if !(MIN_CONCURRENT_FETCHES..=MAX_CONCURRENT_FETCHES).contains(&fetches) {
            errors.push(ConfigValidationError::ConcurrentFetches {
                configured: fetches,
                min_limit: MIN_CONCURRENT_FETCHES,
                max_limit: MAX_CONCURRENT_FETCHES,
            });
        }

        let timeout = self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::RequestTimeout {
                configured: timeout,
                min_limit: MIN_REQUEST_TIMEOUT_SECS,
                max_limit: MAX_REQUEST_TIMEOUT_SECS,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn content_root(&self) -> &str {
        self.content_root.as_deref().unwrap_or(DEFAULT_CONTENT_ROOT)
    }

    /// Directory of the on-disk cache; the platform cache dir by default.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(FileStore::default_dir)
    }

    pub fn cache_ttl_seconds(&self) -> u64 {
        self.cache_ttl_seconds.unwrap_or(DEFAULT_TTL.as_secs())
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches.unwrap_or(8)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Engine tunables derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            ttl: Duration::from_secs(self.cache_ttl_seconds()),
            max_concurrent_fetches: self.max_concurrent_fetches(),
            locator: ContentLocator::new(self.content_root()),
        }
    }
}
