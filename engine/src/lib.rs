//! # Wakfu Theme Engine
//!
//! Core library that turns a remote theme descriptor into a query-ready model.
//! The engine resolves color alias chains, flattens nested theme elements,
//! binds pixmaps to their fetched textures and layers user custom colors on
//! top of the theme declarations, all behind a time-bounded local cache.
//!
//! ## Modules
//!
//! - [`cache`] - Key/value store collaborators and the TTL cache gateway
//! - [`color`] - Color codec, alias resolution and the custom-color layer
//! - [`common`] - Error types shared by every module
//! - [`content`] - Content locators and the network content source
//! - [`loader`] - The [`ThemeEngine`] orchestrator and its settings
//! - [`model`] - Descriptor records as they appear on the wire
//! - [`registry`] - Texture, pixmap, element and skin-part registries

pub mod cache;
pub mod color;
pub mod common;
pub mod content;
pub mod loader;
pub mod model;
pub mod registry;

pub use cache::{CacheGateway, FileStore, KeyValueStore, MemoryStore};
pub use color::{Channel, ColorResolver, CustomColor, OverrideOutcome, Rgba};
pub use common::{ColorError, FetchError, StoreError, ThemeError};
pub use content::{ContentLocator, ContentSource, HttpContentSource};
pub use loader::{Clock, EngineSettings, LoadOutcome, SystemClock, ThemeEngine};
