//! Conversions between RGBA components and their textual notations.
//!
//! Alpha travels as a percentage (`0..=100`) through this module, as it does
//! in theme declarations. Full opacity is never written out explicitly.

use super::types::CustomColor;

/// Alpha value meaning fully opaque, on the percentage scale.
pub const OPAQUE_ALPHA: f64 = 100.0;

/// Scales a unit fraction to a byte, rounding to the nearest value.
///
/// Input outside `[0, 1]` is clamped.
pub fn byte_from_unit(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Two uppercase, zero-padded hex digits.
pub fn hex_digits(byte: u8) -> String {
    format!("{byte:02X}")
}

fn explicit_alpha(alpha100: Option<f64>) -> Option<f64> {
    alpha100.filter(|alpha| *alpha != OPAQUE_ALPHA)
}

/// `#RRGGBB`, followed by `AA` when an alpha other than 100 is given.
pub fn rgba_to_hex(red: u8, green: u8, blue: u8, alpha100: Option<f64>) -> String {
    let mut hex = format!(
        "#{}{}{}",
        hex_digits(red),
        hex_digits(green),
        hex_digits(blue)
    );
    if let Some(alpha) = explicit_alpha(alpha100) {
        hex.push_str(&hex_digits(byte_from_unit(alpha / 100.0)));
    }
    hex
}

/// `r,g,b` as fractions of 255 with two decimals, plus the alpha fraction
/// when an alpha other than 100 is given.
pub fn rgba_to_normalized(red: u8, green: u8, blue: u8, alpha100: Option<f64>) -> String {
    let mut terms = vec![
        format!("{:.2}", f64::from(red) / 255.0),
        format!("{:.2}", f64::from(green) / 255.0),
        format!("{:.2}", f64::from(blue) / 255.0),
    ];
    if let Some(alpha) = explicit_alpha(alpha100) {
        terms.push(format!("{:.2}", alpha / 100.0));
    }
    terms.join(",")
}

/// Wraps a color code in the declaration syntax used by theme files.
pub fn declaration_line(id: &str, color_code: &str) -> String {
    format!(r#"<color id="{id}" color="{color_code}" />"#)
}

/// Parses `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
///
/// Returns `None` for anything else. A missing alpha byte parses as opaque.
pub fn parse_hex(code: &str) -> Option<CustomColor> {
    let digits = code.trim().trim_start_matches('#');
    if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let byte_at = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).ok();
    let alpha = if digits.len() == 8 {
        f64::from(byte_at(6)?) / 255.0
    } else {
        1.0
    };

    Some(CustomColor::new(byte_at(0)?, byte_at(2)?, byte_at(4)?, alpha))
}
