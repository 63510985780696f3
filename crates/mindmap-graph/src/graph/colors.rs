//! Color palette for the mind-map surface
//!
//! Node fills come from content (`#rrggbb`); everything else is fixed here.

use egui::Color32;

/// Used when a node's color string does not parse.
pub const FALLBACK_FILL: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x2e);
pub const EDGE: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
pub const EDGE_OPACITY: f32 = 0.8;

/// Default node outline
pub const NODE_STROKE: Color32 = Color32::WHITE;
/// Dashed outline on collapsed nodes that have children
pub const COLLAPSED_STROKE: Color32 = Color32::from_rgb(0xff, 0xed, 0x4e);

pub const SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 128);
pub const TEXT: Color32 = Color32::WHITE;
pub const TEXT_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 204);

/// Visited indicator dot
pub const VISITED: Color32 = Color32::from_rgb(0xff, 0xaa, 0x00);

pub const PANEL_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(34, 34, 34, 214);
pub const PANEL_BORDER: Color32 = Color32::from_rgb(0x44, 0x44, 0x55);
pub const ACCENT: Color32 = Color32::from_rgb(0x00, 0xff, 0x41);
pub const PROGRESS_TRACK: Color32 = Color32::from_rgba_premultiplied(77, 77, 77, 77);

/// Parse `#rrggbb` or `#rgb`. Anything else is `None`.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(Color32::from_rgb(
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        )),
        3 => {
            let short = |i: usize| channel(digits.get(i..i + 1)?).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Node fill from its content color.
pub fn node_fill(hex: &str) -> Color32 {
    parse_hex_color(hex).unwrap_or(FALLBACK_FILL)
}

/// Scale a color's alpha by `opacity` in [0, 1].
pub fn apply_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            parse_hex_color("#41b3ff"),
            Some(Color32::from_rgb(0x41, 0xb3, 0xff))
        );
        assert_eq!(parse_hex_color("#fff"), Some(Color32::WHITE));
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(parse_hex_color("41b3ff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(node_fill("bogus"), FALLBACK_FILL);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(apply_opacity(Color32::WHITE, 2.0), Color32::WHITE);
        assert_eq!(apply_opacity(Color32::WHITE, 0.0), Color32::TRANSPARENT);
    }
}
