use super::Catalog;
use super::textures::TextureRegistry;
use crate::model::Pixmap;

/// Returns a copy of `pixmap` with its texture image bound.
///
/// A texture id the registry does not know leaves `image` empty.
pub fn bind_image(pixmap: &Pixmap, textures: &TextureRegistry) -> Pixmap {
    let image = textures.get(&pixmap.texture).cloned();
    if image.is_none() {
        log::debug!(
            "Pixmap '{}' references unknown texture '{}'",
            pixmap.id,
            pixmap.texture
        );
    }
    Pixmap {
        image,
        ..pixmap.clone()
    }
}

/// Pixmaps of the theme, keyed by id, each bound to its texture image.
#[derive(Debug, Clone, Default)]
pub struct PixmapRegistry {
    pixmaps: Catalog<Pixmap>,
}

impl PixmapRegistry {
    pub fn register_all(pixmaps: &[Pixmap], textures: &TextureRegistry) -> Self {
        let mut registry = Self::default();
        for pixmap in pixmaps {
            registry
                .pixmaps
                .insert(pixmap.id.clone(), bind_image(pixmap, textures));
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&Pixmap> {
        self.pixmaps.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Pixmap> {
        self.pixmaps.values()
    }

    pub fn len(&self) -> usize {
        self.pixmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixmaps.is_empty()
    }
}
