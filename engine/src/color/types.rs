use crate::model::ColorRecord;
use serde::{Deserialize, Serialize};

/// One component of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    /// Percentage, `0..=100`.
    Alpha,
}

impl Channel {
    pub(crate) fn read(self, color: &ColorRecord) -> Option<f64> {
        match self {
            Channel::Red => color.red.map(f64::from),
            Channel::Green => color.green.map(f64::from),
            Channel::Blue => color.blue.map(f64::from),
            Channel::Alpha => color.alpha,
        }
    }
}

/// A fully resolved color. `alpha` is a percentage; `None` means opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: Option<f64>,
}

/// A user-chosen replacement for a theme color.
///
/// This is also the shape persisted in the custom-color store entry:
/// components in `0..=255` and alpha as a fraction in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomColor {
    #[serde(rename = "r")]
    pub red: u8,
    #[serde(rename = "g")]
    pub green: u8,
    #[serde(rename = "b")]
    pub blue: u8,
    #[serde(rename = "a")]
    pub alpha: f64,
}

impl CustomColor {
    pub fn new(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Alpha on the percentage scale used by theme declarations.
    pub fn alpha_percent(&self) -> f64 {
        self.alpha * 100.0
    }

    pub(crate) fn from_record(color: &ColorRecord) -> Option<Self> {
        Some(Self::new(
            color.red?,
            color.green?,
            color.blue?,
            color.alpha.unwrap_or(100.0) / 100.0,
        ))
    }
}

/// What [`ColorResolver::set_override`](super::ColorResolver::set_override) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideOutcome {
    /// The override was installed or replaced an earlier one.
    Applied,
    /// The value matches the theme declaration; any earlier override was dropped.
    Redundant,
    /// The theme declares no color with this id; nothing changed.
    UnknownColor,
}
