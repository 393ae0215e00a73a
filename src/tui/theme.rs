use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the composer TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub selection_bg: Color,
    /// Resolved mention chips
    pub mention: Color,
    /// Mentions that matched no known user
    pub mention_unknown: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            mention: Color::Rgb(0x44, 0xDD, 0xFF),
            mention_unknown: Color::Rgb(0x7D, 0x78, 0xBF),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the workspace UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "selection_bg" => &mut theme.selection_bg,
                "mention" => &mut theme.mention,
                "mention_unknown" => &mut theme.mention_unknown,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#44DDFF"),
            Some(Color::Rgb(0x44, 0xDD, 0xFF))
        );
        assert_eq!(parse_hex_color("44DDFF"), None);
        assert_eq!(parse_hex_color("#44DD"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_non_ascii_color_is_ignored() {
        // Six bytes but only five chars; must not slice inside 'é'
        assert_eq!(parse_hex_color("#a\u{e9}bcd"), None);

        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#a\u{e9}bcd".into());
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.highlight, Theme::default().highlight);
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("mention".into(), "#112233".into());
        ui.colors.insert("nonsense".into(), "#000000".into());
        ui.colors.insert("dim".into(), "not a color".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.mention, Color::Rgb(0x11, 0x22, 0x33));
        // Bad values and unknown keys leave defaults alone
        assert_eq!(theme.dim, Theme::default().dim);
        assert_eq!(theme.background, Theme::default().background);
    }
}
