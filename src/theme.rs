//! Colors and block glyphs handed to the renderer

use crate::settings::VisualSettings;
use ratatui::style::Color;
use std::str::FromStr;

/// Default playfield background
pub const DEFAULT_BACKGROUND: Color = Color::Rgb(0x09, 0x09, 0x0b);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub border: Color,
    /// Glyph for a filled cell, two columns wide
    pub block: &'static str,
    /// Glyph for an empty cell
    pub empty: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            border: Color::Rgb(0x27, 0x27, 0x2a),
            block: "██",
            empty: "  ",
        }
    }
}

impl Theme {
    pub fn from_settings(visual: &VisualSettings) -> Self {
        let background = Color::from_str(&visual.background).unwrap_or_else(|_| {
            tracing::warn!("Unknown background color {:?}, using default", visual.background);
            DEFAULT_BACKGROUND
        });
        let block = match visual.block_style.as_str() {
            "bracket" => "[]",
            "round" => "()",
            _ => "██",
        };
        Self {
            background,
            block,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let visual = VisualSettings {
            block_style: "bracket".to_string(),
            background: "#ff0000".to_string(),
        };
        let theme = Theme::from_settings(&visual);
        assert_eq!(theme.block, "[]");
        assert_eq!(theme.background, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_bad_color_falls_back() {
        let visual = VisualSettings {
            block_style: "solid".to_string(),
            background: "not-a-color".to_string(),
        };
        let theme = Theme::from_settings(&visual);
        assert_eq!(theme.background, DEFAULT_BACKGROUND);
        assert_eq!(theme.block, "██");
    }
}
