use crate::common::FetchError;
use crate::model::{DecodedImage, ThemeDescriptor};
use async_trait::async_trait;

/// Where theme descriptors and texture images come from.
///
/// Both calls may fail; the engine treats any failure as fatal to the load
/// in progress and leaves retry policy to its caller.
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use engine::common::FetchError;
/// use engine::content::ContentSource;
/// use engine::model::{DecodedImage, ThemeDescriptor};
///
/// struct Offline;
///
/// #[async_trait]
/// impl ContentSource for Offline {
///     async fn fetch_descriptor(&self, url: &str) -> Result<ThemeDescriptor, FetchError> {
///         Err(FetchError::RequestFailed { url: url.to_string(), reason: "offline".to_string() })
///     }
///
///     async fn fetch_image(&self, url: &str) -> Result<DecodedImage, FetchError> {
///         Err(FetchError::RequestFailed { url: url.to_string(), reason: "offline".to_string() })
///     }
/// }
/// ```
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Retrieves and parses the theme descriptor at `url`.
    async fn fetch_descriptor(&self, url: &str) -> Result<ThemeDescriptor, FetchError>;

    /// Retrieves the image at `url`.
    async fn fetch_image(&self, url: &str) -> Result<DecodedImage, FetchError>;
}
