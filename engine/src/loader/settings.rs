use crate::cache::DEFAULT_TTL;
use crate::content::ContentLocator;
use std::time::Duration;

/// Default bound on concurrent texture requests.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Tunables of a [`ThemeEngine`](super::ThemeEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// How long a cached descriptor is used before it is fetched again.
    pub ttl: Duration,
    /// Upper bound on texture requests in flight during a load.
    pub max_concurrent_fetches: usize,
    pub locator: ContentLocator,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            locator: ContentLocator::default(),
        }
    }
}
