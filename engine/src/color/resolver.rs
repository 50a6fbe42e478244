use super::codec::{
    OPAQUE_ALPHA, byte_from_unit, declaration_line, rgba_to_hex, rgba_to_normalized,
};
use super::types::{Channel, CustomColor, OverrideOutcome, Rgba};
use crate::common::ColorError;
use crate::model::ColorRecord;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Alpha values closer than this on the percentage scale compare equal.

/// Resolves theme colors through their alias chains.
///
/// Holds the colors declared by the theme and a separate layer of custom
/// overrides, both keyed by color id. Every query takes an `original_only`
/// flag: when `false`, each step of an alias chain prefers the override
/// registered for that step's id; when `true`, the override layer is ignored.
///
/// Unknown ids resolve to `Ok(None)`. Only a looping alias chain is an error.
///
/// # Examples
///
/// ```no_run
/// use engine::color::{ColorResolver, CustomColor};
/// use engine::model::ColorRecord;
///
/// let mut resolver = ColorResolver::from_colors(vec![ColorRecord {
///     id: "accent".to_string(),
///     red: Some(10),
///     green: Some(20),
///     blue: Some(30),
///     ..Default::default()
/// }]);
///
/// assert_eq!(resolver.resolve_hex("accent", false).unwrap().as_deref(), Some("#0A141E"));
///
/// resolver.set_override("accent", CustomColor::new(255, 0, 0, 1.0));
/// assert_eq!(resolver.resolve_hex("accent", false).unwrap().as_deref(), Some("#FF0000"));
/// assert_eq!(resolver.resolve_hex("accent", true).unwrap().as_deref(), Some("#0A141E"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColorResolver {
    originals: HashMap<String, ColorRecord>,
    order: Vec<String>,
    overrides: HashMap<String, ColorRecord>,
}

impl ColorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the resolver with theme colors. A repeated id replaces the
    /// earlier declaration but keeps its position.
    pub fn from_colors(colors: impl IntoIterator<Item = ColorRecord>) -> Self {
        let mut resolver = Self::new();
        for color in colors {
            if !resolver.originals.contains_key(&color.id) {
                resolver.order.push(color.id.clone());
            }
            resolver.originals.insert(color.id.clone(), color);
        }
        resolver
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// The record a query for `id` starts from.
    pub fn get(&self, id: &str, original_only: bool) -> Option<&ColorRecord> {
        if !original_only {
            if let Some(custom) = self.overrides.get(id) {
                return Some(custom);
            }
        }
        self.originals.get(id)
    }

    /// Every color in declaration order.
    pub fn colors(&self, original_only: bool) -> Vec<&ColorRecord> {
        self.order
            .iter()
            .filter_map(|id| self.get(id, original_only))
            .collect()
    }

    /// Resolves one channel of `id` by walking its alias chain.
    ///
    /// A node's own alpha takes precedence over the alpha of the color it
    /// aliases. The walk ends at the first node without `colorUsed` and
    /// returns that node's declared component, which may itself be absent.
    pub fn resolve_component(
        &self,
        id: &str,
        channel: Channel,
        original_only: bool,
    ) -> Result<Option<f64>, ColorError> {
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        let mut current = id;

        loop {
            chain.push(current);
            if !visited.insert(current) {
                return Err(ColorError::CyclicAlias {
                    id: id.to_string(),
                    chain: chain.into_iter().map(str::to_string).collect(),
                });
            }

            let Some(color) = self.get(current, original_only) else {
                return Ok(None);
            };

            if channel == Channel::Alpha && color.alpha.is_some() {
                return Ok(color.alpha);
            }

            match color.alias() {
                Some(next) => current = next,
                None => return Ok(channel.read(color)),
            }
        }
    }

    /// Resolves all channels. `None` when red, green or blue is missing.
    pub fn resolve(&self, id: &str, original_only: bool) -> Result<Option<Rgba>, ColorError> {
        let byte = |channel| -> Result<Option<u8>, ColorError> {
            Ok(self
                .resolve_component(id, channel, original_only)?
                .map(|value| value.round().clamp(0.0, 255.0) as u8))
        };

        let (Some(red), Some(green), Some(blue)) =
            (byte(Channel::Red)?, byte(Channel::Green)?, byte(Channel::Blue)?)
        else {
            return Ok(None);
        };
        let alpha = self.resolve_component(id, Channel::Alpha, original_only)?;

        Ok(Some(Rgba {
            red,
            green,
            blue,
            alpha,
        }))
    }

    pub fn resolve_hex(&self, id: &str, original_only: bool) -> Result<Option<String>, ColorError> {
        Ok(self
            .resolve(id, original_only)?
            .map(|rgba| rgba_to_hex(rgba.red, rgba.green, rgba.blue, rgba.alpha)))
    }

    /// Builds the `<color id=".." color=".." />` line for `id`.
    ///
    /// A pure alias keeps pointing at the color it aliases (with an `@alpha`
    /// suffix when it declares its own translucency); anything else is
    /// written out as concrete RGBA, in hex or as normalized fractions.
    pub fn resolve_declaration(
        &self,
        id: &str,
        use_hex: bool,
        original_only: bool,
    ) -> Result<Option<String>, ColorError> {
        let Some(color) = self.get(id, original_only) else {
            return Ok(None);
        };

        let code = match color.alias() {
            Some(alias) => match color.alpha.filter(|alpha| *alpha != OPAQUE_ALPHA) {
                Some(alpha) => format!("{alias}@{}", alpha / 100.0),
                None => alias.to_string(),
            },
            None => {
                let Some(rgba) = self.resolve(id, original_only)? else {
                    return Ok(None);
                };
                if use_hex {
                    rgba_to_hex(rgba.red, rgba.green, rgba.blue, rgba.alpha)
                } else {
                    rgba_to_normalized(rgba.red, rgba.green, rgba.blue, rgba.alpha)
                }
            }
        };

        Ok(Some(declaration_line(id, &code)))
    }

    /// Installs a custom color for `id`.
    ///
    /// When the value equals what the theme itself resolves to, the override
    /// would be a no-op: any existing one is removed instead. Non-color
    /// attributes of the theme record are carried over to the override.
    pub fn set_override(&mut self, id: &str, custom: CustomColor) -> OverrideOutcome {
        let Some(original) = self.originals.get(id) else {
            log::debug!("Ignoring custom color for unknown color '{id}'");
            return OverrideOutcome::UnknownColor;
        };
        let attributes = original.attributes.clone();

        let redundant = match self.resolve(id, true) {
            Ok(Some(rgba)) => Self::matches(&rgba, &custom),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Overriding color '{id}' whose declaration cannot be resolved: {e}");
                false
            }
        };

        if redundant {
            if self.overrides.remove(id).is_some() {
                log::debug!("Custom color for '{id}' matches the theme, removed it");
            }
            return OverrideOutcome::Redundant;
        }

        self.overrides.insert(
            id.to_string(),
            ColorRecord {
                id: id.to_string(),
                red: Some(custom.red),
                green: Some(custom.green),
                blue: Some(custom.blue),
                alpha: Some(custom.alpha_percent()),
                color_used: None,
                attributes,
            },
        );
        OverrideOutcome::Applied
    }

    /// Alpha is compared as the byte the codec would encode.
    fn matches(rgba: &Rgba, custom: &CustomColor) -> bool {
        let original_alpha = rgba.alpha.unwrap_or(OPAQUE_ALPHA) / 100.0;
        rgba.red == custom.red
            && rgba.green == custom.green
            && rgba.blue == custom.blue
            && byte_from_unit(original_alpha) == byte_from_unit(custom.alpha)
    }

    /// Applies a persisted custom-color payload. Returns how many overrides
    /// ended up installed.
    pub fn apply_custom_colors(&mut self, customs: &BTreeMap<String, CustomColor>) -> usize {
        customs
            .iter()
            .filter(|(id, custom)| self.set_override(id, **custom) == OverrideOutcome::Applied)
            .count()
    }

    /// Removes the override for `id`. Returns whether one existed.
    pub fn clear_override(&mut self, id: &str) -> bool {
        self.overrides.remove(id).is_some()
    }

    pub fn clear_all_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.overrides.contains_key(id)
    }

    /// The override layer in its persisted shape.
    pub fn custom_colors(&self) -> BTreeMap<String, CustomColor> {
        self.overrides
            .iter()
            .filter_map(|(id, color)| Some((id.clone(), CustomColor::from_record(color)?)))
            .collect()
    }
}
