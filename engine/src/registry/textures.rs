use crate::common::{FetchError, ThemeError};
use crate::content::{ContentLocator, ContentSource};
use crate::model::{DecodedImage, Texture};
use futures::future::try_join_all;
use std::collections::HashMap;
use tokio::sync::Semaphore;

/// Fetched texture images, reachable by texture id and by file name.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    images: HashMap<String, DecodedImage>,
    textures: usize,
}

impl TextureRegistry {
    /// Fetches every texture concurrently and waits for all of them.
    ///
    /// At most `max_concurrent` requests are in flight at once. The load is
    /// all-or-nothing: the first failed retrieval fails the whole call and
    /// the remaining requests are dropped. Every path is checked before any
    /// request goes out, so a malformed path costs no network traffic.
    pub async fn load_all(
        textures: &[Texture],
        source: &dyn ContentSource,
        locator: &ContentLocator,
        max_concurrent: usize,
    ) -> Result<Self, ThemeError> {
        let named = textures
            .iter()
            .map(|texture| Ok((texture, ContentLocator::texture_name(&texture.path)?)))
            .collect::<Result<Vec<_>, ThemeError>>()?;

        let semaphore = Semaphore::new(max_concurrent.max(1));
        let fetches = named.into_iter().map(|(texture, name)| {
            let semaphore = &semaphore;
            async move {
                let url = locator.texture_url(&name);
                let Ok(_permit) = semaphore.acquire().await else {
                    return Err(FetchError::RequestFailed {
                        url,
                        reason: "texture fetch pool closed".to_string(),
                    });
                };
                let image = source.fetch_image(&url).await?;
                Ok((texture.id.as_str(), name, image))
            }
        });

        let fetched = try_join_all(fetches).await.inspect_err(|e| {
            log::error!("Texture retrieval failed, aborting texture load: {e}");
        })?;

        let mut registry = Self::default();
        for (id, name, image) in fetched {
            registry.insert(id, &name, image);
        }
        log::debug!("Loaded {} textures", registry.textures);
        Ok(registry)
    }

    /// Registers `image` under both the texture id and its file name.
    pub fn insert(&mut self, id: &str, name: &str, image: DecodedImage) {
        self.images.insert(name.to_string(), image.clone());
        self.images.insert(id.to_string(), image);
        self.textures += 1;
    }

    /// Looks an image up by texture id or by file name.
    pub fn get(&self, key: &str) -> Option<&DecodedImage> {
        self.images.get(key)
    }

    /// Number of textures loaded.
    pub fn len(&self) -> usize {
        self.textures
    }

    pub fn is_empty(&self) -> bool {
        self.textures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ThemeDescriptor;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ImageServer {
        failing: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentSource for ImageServer {
        async fn fetch_descriptor(&self, url: &str) -> Result<ThemeDescriptor, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }

        async fn fetch_image(&self, url: &str) -> Result<DecodedImage, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            if self.failing.as_deref().is_some_and(|failing| url.ends_with(failing)) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            Ok(DecodedImage::new(url, url.as_bytes().to_vec()))
        }
    }

    fn texture(id: &str, name: &str) -> Texture {
        Texture {
            id: id.to_string(),
            path: format!("gui/theme/images/{name}.tga"),
        }
    }

    #[tokio::test]
    async fn test_both_keys_share_one_handle() {
        let server = ImageServer::default();
        let locator = ContentLocator::new("https://cdn.test/");
        let registry = TextureRegistry::load_all(
            &[texture("t1", "foo"), texture("t2", "bar")],
            &server,
            &locator,
            4,
        )
        .await
        .unwrap();

        assert_eq!(registry.len(), 2);
        let by_id = registry.get("t1").unwrap();
        let by_name = registry.get("foo").unwrap();
        assert!(by_id.same_handle(by_name));
        assert_eq!(by_id.url(), "https://cdn.test/theme/images/foo.png");
        assert!(registry.get("baz").is_none());
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_join() {
        let server = ImageServer {
            failing: Some("bar.png".to_string()),
            ..Default::default()
        };
        let result = TextureRegistry::load_all(
            &[texture("t1", "foo"), texture("t2", "bar")],
            &server,
            &ContentLocator::default(),
            1,
        )
        .await;

        assert!(matches!(
            result,
            Err(ThemeError::Fetch(FetchError::Status { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_malformed_path_fails_before_any_request() {
        let server = ImageServer::default();
        let textures = [
            texture("t1", "foo"),
            Texture {
                id: "t2".to_string(),
                path: "gui/images/bar.tga".to_string(),
            },
        ];
        let result =
            TextureRegistry::load_all(&textures, &server, &ContentLocator::default(), 4).await;

        assert!(matches!(result, Err(ThemeError::MalformedPath { .. })));
        assert!(server.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_texture_list() {
        let server = ImageServer::default();
        let registry = TextureRegistry::load_all(&[], &server, &ContentLocator::default(), 4)
            .await
            .unwrap();
        assert!(registry.is_empty());
    }
}
