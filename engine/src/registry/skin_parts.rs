use super::Catalog;
use crate::common::ThemeError;
use crate::content::ContentLocator;
use crate::model::{AppSkinPart, SkinPart};

/// Derives the id and asset URL of a skin part from its path.
pub fn register(raw: &AppSkinPart, locator: &ContentLocator) -> Result<SkinPart, ThemeError> {
    Ok(SkinPart {
        id: ContentLocator::skin_part_name(&raw.path)?,
        path: raw.path.clone(),
        asset_url: locator.asset_url(&raw.path),
        attributes: raw.attributes.clone(),
    })
}

/// Application skin parts keyed by their derived id.
#[derive(Debug, Clone, Default)]
pub struct SkinPartRegistry {
    parts: Catalog<SkinPart>,
}

impl SkinPartRegistry {
    pub fn register_all(
        raw_parts: &[AppSkinPart],
        locator: &ContentLocator,
    ) -> Result<Self, ThemeError> {
        let mut registry = Self::default();
        for raw in raw_parts {
            let part = register(raw, locator)?;
            registry.parts.insert(part.id.clone(), part);
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&SkinPart> {
        self.parts.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &SkinPart> {
        self.parts.values()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
