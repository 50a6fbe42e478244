pub mod gateway;
pub mod store;

pub use gateway::{
    CUSTOM_COLORS_KEY, CacheEntry, CacheGateway, DEFAULT_TTL, THEME_DATA_KEY,
    THEME_FETCHED_AT_KEY, is_fresh,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
