//! Registries built from a descriptor once its textures are fetched.
//!
//! [`TextureRegistry`] has to be complete before any of the others is built:
//! pixmaps and flattened elements read their images from it.

pub mod elements;
pub mod pixmaps;
pub mod skin_parts;
pub mod textures;

pub use elements::{ElementRegistry, flatten};
pub use pixmaps::{PixmapRegistry, bind_image};
pub use skin_parts::{SkinPartRegistry, register};
pub use textures::TextureRegistry;

use std::collections::HashMap;

/// Id-keyed records that remember their declaration order.
///
/// A repeated id replaces the earlier record and keeps its position.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    items: HashMap<String, T>,
    order: Vec<String>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> Catalog<T> {
    pub fn insert(&mut self, id: String, item: T) {
        if !self.items.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.items.insert(id, item);
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    /// Records in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keeps_first_position_and_last_value() {
        let mut catalog = Catalog::default();
        catalog.insert("b".to_string(), 1);
        catalog.insert("a".to_string(), 2);
        catalog.insert("b".to_string(), 3);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b"), Some(&3));
        assert_eq!(catalog.values().copied().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(catalog.get("c"), None);
    }
}
