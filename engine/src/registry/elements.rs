use super::Catalog;
use super::pixmaps::bind_image;
use super::textures::TextureRegistry;
use crate::model::{FlatElement, ThemeElement};

/// Collapses the tree under `root` into a single record.
///
/// The result keeps the root's id and attributes and gathers the
/// `specificPixmaps` of every node in pre-order: the node itself first, then
/// its children left to right, depth first. Each pixmap gets its image bound.
/// Child elements are not kept. The traversal uses an explicit stack, so tree
/// depth is not limited by the call stack.
pub fn flatten(root: &ThemeElement, textures: &TextureRegistry) -> FlatElement {
    let mut pixmaps = Vec::new();
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        pixmaps.extend(
            node.specific_pixmaps
                .iter()
                .flatten()
                .map(|pixmap| bind_image(pixmap, textures)),
        );
        if let Some(children) = &node.children_theme_elements {
            pending.extend(children.iter().rev());
        }
    }

    FlatElement {
        id: root.id.clone(),
        attributes: root.attributes.clone(),
        pixmaps,
    }
}

/// Flattened root elements, keyed by root id.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: Catalog<FlatElement>,
}

impl ElementRegistry {
    pub fn register_all(roots: &[ThemeElement], textures: &TextureRegistry) -> Self {
        let mut registry = Self::default();
        for root in roots {
            registry
                .elements
                .insert(root.id.clone(), flatten(root, textures));
        }
        registry
    }

    pub fn get(&self, id: &str) -> Option<&FlatElement> {
        self.elements.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &FlatElement> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attributes, DecodedImage, Pixmap};
    use serde_json::Value;

    fn pixmap(id: &str) -> Pixmap {
        Pixmap {
            id: id.to_string(),
            texture: "t1".to_string(),
            attributes: Attributes::new(),
            image: None,
        }
    }

    fn element(id: &str, pixmaps: &[&str], children: Vec<ThemeElement>) -> ThemeElement {
        ThemeElement {
            id: id.to_string(),
            specific_pixmaps: (!pixmaps.is_empty())
                .then(|| pixmaps.iter().map(|id| pixmap(id)).collect()),
            children_theme_elements: (!children.is_empty()).then_some(children),
            attributes: Attributes::new(),
        }
    }

    fn textures() -> TextureRegistry {
        let mut textures = TextureRegistry::default();
        textures.insert("t1", "atlas", DecodedImage::new("atlas.png", vec![0u8; 4]));
        textures
    }

    fn ids(flat: &FlatElement) -> Vec<&str> {
        flat.pixmaps.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_root_then_children_in_order() {
        let root = element(
            "root",
            &["p0"],
            vec![element("left", &["p1"], vec![]), element("right", &["p2"], vec![])],
        );
        let flat = flatten(&root, &textures());
        assert_eq!(ids(&flat), vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_depth_first_pre_order() {
        let root = element(
            "root",
            &[],
            vec![
                element(
                    "a",
                    &["a0", "a1"],
                    vec![element("a.x", &["ax"], vec![element("a.x.y", &["axy"], vec![])])],
                ),
                element("b", &["b0"], vec![]),
            ],
        );
        let flat = flatten(&root, &textures());
        assert_eq!(ids(&flat), vec!["a0", "a1", "ax", "axy", "b0"]);
    }

    #[test]
    fn test_images_are_bound_and_attributes_kept() {
        let mut root = element("root", &["p0"], vec![element("child", &["p1"], vec![])]);
        root.attributes
            .insert("type".to_string(), Value::from("window"));

        let textures = textures();
        let flat = flatten(&root, &textures);

        assert_eq!(flat.id, "root");
        assert_eq!(flat.attributes.get("type"), Some(&Value::from("window")));
        for pixmap in &flat.pixmaps {
            assert!(pixmap.image.as_ref().unwrap().same_handle(textures.get("t1").unwrap()));
        }
    }

    #[test]
    fn test_element_without_pixmaps_or_children() {
        let flat = flatten(&element("bare", &[], vec![]), &textures());
        assert!(flat.pixmaps.is_empty());
    }

    #[test]
    fn test_very_deep_tree_does_not_overflow() {
        let mut node = element("leaf", &["deepest"], vec![]);
        for depth in 0..50_000 {
            node = element(&format!("n{depth}"), &[], vec![node]);
        }
        let flat = flatten(&node, &textures());
        assert_eq!(ids(&flat), vec!["deepest"]);
        // Dropping a 50k deep tree recursively would overflow; unwind it by hand.
        let mut pending = vec![node];
        while let Some(mut next) = pending.pop() {
            pending.extend(next.children_theme_elements.take().into_iter().flatten());
        }
    }

    #[test]
    fn test_only_roots_are_registered() {
        let roots = vec![
            element("e1", &["p0"], vec![element("nested", &["p1"], vec![])]),
            element("e2", &[], vec![]),
        ];
        let registry = ElementRegistry::register_all(&roots, &textures());

        assert_eq!(registry.len(), 2);
        assert!(registry.get("nested").is_none());
        assert_eq!(ids(registry.get("e1").unwrap()), vec!["p0", "p1"]);
    }
}
