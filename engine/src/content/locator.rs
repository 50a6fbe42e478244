use crate::common::ThemeError;

/// Default content root of the game data CDN.
pub const DEFAULT_CONTENT_ROOT: &str = "https://wakfu.cdn.ankama.com/gamedata/";

const DESCRIPTOR_PATH: &str = "theme/theme.json";
const TEXTURE_MARKER: &str = "theme/images/";
const TEXTURE_EXTENSION: &str = ".tga";
const SKIN_PART_MARKER: &str = "appSkin/";
const SKIN_PART_EXTENSION: &str = ".png";

/// Turns descriptor paths into retrieval URLs and display names.
///
/// Pure string derivations, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLocator {
    root: String,
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_ROOT)
    }
}

impl ContentLocator {
    /// A locator rooted at `root`; a trailing `/` is added when missing.
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        if !root.ends_with('/') {
            root.push('/');
        }
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn descriptor_url(&self) -> String {
        format!("{}{DESCRIPTOR_PATH}", self.root)
    }

    pub fn texture_url(&self, name: &str) -> String {
        format!("{}{TEXTURE_MARKER}{name}.png", self.root)
    }

    pub fn asset_url(&self, path: &str) -> String {
        format!("{}{}", self.root, path.trim_start_matches('/'))
    }

    /// `"gui/theme/images/foo.tga"` → `"foo"`.
    pub fn texture_name(path: &str) -> Result<String, ThemeError> {
        strip_marker(path, TEXTURE_MARKER, TEXTURE_EXTENSION)
    }

    /// `"theme/appSkin/close.png"` → `"close"`.
    pub fn skin_part_name(path: &str) -> Result<String, ThemeError> {
        strip_marker(path, SKIN_PART_MARKER, SKIN_PART_EXTENSION)
    }
}

fn strip_marker(path: &str, marker: &str, extension: &str) -> Result<String, ThemeError> {
    let Some((_, rest)) = path.split_once(marker) else {
        return Err(ThemeError::MalformedPath {
            path: path.to_string(),
            marker: marker.to_string(),
        });
    };
    let name = rest.split(extension).next().unwrap_or(rest);
    if name.is_empty() {
        return Err(ThemeError::MalformedPath {
            path: path.to_string(),
            marker: marker.to_string(),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let locator = ContentLocator::new("https://cdn.test/gamedata");
        assert_eq!(locator.root(), "https://cdn.test/gamedata/");
        assert_eq!(
            locator.descriptor_url(),
            "https://cdn.test/gamedata/theme/theme.json"
        );
        assert_eq!(
            locator.texture_url("foo"),
            "https://cdn.test/gamedata/theme/images/foo.png"
        );
        assert_eq!(
            locator.asset_url("theme/appSkin/close.png"),
            "https://cdn.test/gamedata/theme/appSkin/close.png"
        );
        assert_eq!(
            ContentLocator::default().descriptor_url(),
            "https://wakfu.cdn.ankama.com/gamedata/theme/theme.json"
        );
    }

    #[test]
    fn test_texture_name() {
        assert_eq!(
            ContentLocator::texture_name("C:/build/theme/images/foo.tga").unwrap(),
            "foo"
        );
        assert_eq!(
            ContentLocator::texture_name("theme/images/sub/bar.tga").unwrap(),
            "sub/bar"
        );
        assert_eq!(
            ContentLocator::texture_name("theme/images/baz.png").unwrap(),
            "baz.png"
        );
    }

    #[test]
    fn test_skin_part_name() {
        assert_eq!(
            ContentLocator::skin_part_name("theme/appSkin/close.png").unwrap(),
            "close"
        );
    }

    #[test]
    fn test_missing_marker_is_malformed() {
        assert_eq!(
            ContentLocator::texture_name("images/foo.tga"),
            Err(ThemeError::MalformedPath {
                path: "images/foo.tga".to_string(),
                marker: "theme/images/".to_string(),
            })
        );
        assert!(ContentLocator::skin_part_name("theme/skin/close.png").is_err());
        assert!(ContentLocator::texture_name("theme/images/.tga").is_err());
    }
}
