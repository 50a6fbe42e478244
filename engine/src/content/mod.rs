pub mod http;
pub mod locator;
pub mod source;

pub use http::HttpContentSource;
pub use locator::{ContentLocator, DEFAULT_CONTENT_ROOT};
pub use source::ContentSource;
