use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Attributes the engine carries through without interpreting them.
pub type Attributes = Map<String, Value>;

/// The raw theme payload as published by the content root.
///
/// Every collection defaults to empty so that a partial descriptor still
/// loads. The descriptor is never mutated after parsing; a reload replaces
/// it as a whole.
///
/// # Examples
///
/// ```no_run
/// use engine::model::ThemeDescriptor;
///
/// let descriptor: ThemeDescriptor = serde_json::from_str(r#"{
///     "textures": [{ "id": "t1", "path": "gui/theme/images/foo.tga" }],
///     "colors": [{ "id": "c1", "red": 10, "green": 20, "blue": 30 }]
/// }"#).unwrap();
/// assert_eq!(descriptor.textures.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDescriptor {
    #[serde(default)]
    pub textures: Vec<Texture>,
    #[serde(default)]
    pub pixmaps: Vec<Pixmap>,
    #[serde(default)]
    pub colors: Vec<ColorRecord>,
    /// Root nodes of the element trees.
    #[serde(default, rename = "themeElement")]
    pub theme_elements: Vec<ThemeElement>,
    #[serde(default)]
    pub app_skin_parts: Vec<AppSkinPart>,
}

/// A texture declaration: an id and the path of its source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    pub id: String,
    pub path: String,
}

/// A fetched texture image.
///
/// The bytes are opaque to the engine. Cloning is cheap and every clone
/// points at the same allocation, which is how the texture registry hands the
/// very same handle out under both of its keys.
#[derive(Clone)]
pub struct DecodedImage {
    url: String,
    bytes: Arc<[u8]>,
}

impl DecodedImage {
    pub fn new(url: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            url: url.into(),
            bytes: bytes.into(),
        }
    }

    /// Locator the image was retrieved from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` when both handles share one allocation.
    pub fn same_handle(&self, other: &DecodedImage) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl PartialEq for DecodedImage {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.bytes == other.bytes
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("url", &self.url)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A region of a texture.
///
/// Geometry and flags live in `attributes`. `image` is bound once during load
/// and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pixmap {
    pub id: String,
    /// Id of the texture this pixmap is cut from.
    pub texture: String,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(skip)]
    pub image: Option<DecodedImage>,
}

/// A color as declared by the theme.
///
/// Either concrete (`red`, `green`, `blue` and an optional `alpha`) or an
/// alias delegating to another color through `color_used`. `alpha` is a
/// percentage; absent means fully opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_used: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ColorRecord {
    /// Returns the aliased id when this color delegates to another one.
    pub fn alias(&self) -> Option<&str> {
        self.color_used.as_deref().filter(|alias| !alias.is_empty())
    }
}

/// A node of an element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_pixmaps: Option<Vec<Pixmap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_theme_elements: Option<Vec<ThemeElement>>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A root element with every pixmap of its subtree gathered in pre-order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatElement {
    pub id: String,
    pub attributes: Attributes,
    pub pixmaps: Vec<Pixmap>,
}

/// A skin part as declared by the descriptor; only its path is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSkinPart {
    pub path: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A skin part with its id and asset URL derived from the path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinPart {
    pub id: String,
    pub path: String,
    pub asset_url: String,
    pub attributes: Attributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults_missing_collections() {
        let descriptor: ThemeDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(descriptor, ThemeDescriptor::default());
    }

    #[test]
    fn test_unknown_attributes_survive_a_round_trip() {
        let json = r#"{
            "pixmaps": [{ "id": "p1", "texture": "t1", "x": 4, "y": 8, "flipHorizontal": true }],
            "colors": [{ "id": "c1", "colorUsed": "c2", "alpha": 50.0, "category": "ui" }],
            "themeElement": [{ "id": "e1", "type": "window" }]
        }"#;
        let descriptor: ThemeDescriptor = serde_json::from_str(json).unwrap();

        let pixmap = &descriptor.pixmaps[0];
        assert_eq!(pixmap.attributes.get("x"), Some(&Value::from(4)));
        assert_eq!(
            pixmap.attributes.get("flipHorizontal"),
            Some(&Value::Bool(true))
        );
        assert_eq!(descriptor.colors[0].alias(), Some("c2"));
        assert_eq!(
            descriptor.theme_elements[0].attributes.get("type"),
            Some(&Value::from("window"))
        );

        let serialized = serde_json::to_string(&descriptor).unwrap();
        let reparsed: ThemeDescriptor = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed, descriptor);
    }

    #[test]
    fn test_empty_alias_is_not_an_alias() {
        let color = ColorRecord {
            id: "c1".to_string(),
            color_used: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(color.alias(), None);
    }

    #[test]
    fn test_image_clones_share_their_handle() {
        let image = DecodedImage::new("https://cdn/foo.png", vec![1u8, 2, 3]);
        let clone = image.clone();
        let copy = DecodedImage::new("https://cdn/foo.png", vec![1u8, 2, 3]);

        assert!(image.same_handle(&clone));
        assert!(!image.same_handle(&copy));
        assert_eq!(image, copy);
    }
}
