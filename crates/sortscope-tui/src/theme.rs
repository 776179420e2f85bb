use ratatui::style::Color;
use sortscope_core::bars::TagSet;
use sortscope_core::config::ThemeColorOverrides;
use sortscope_core::Tag;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Bar colors
    pub bar: Color,
    pub comparing: Color,
    pub swapping: Color,
    pub sorted: Color,
    pub active: Color,

    // Semantic colors
    pub accent: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            bar: Color::Rgb(0x7d, 0xae, 0xa3),
            comparing: Color::Rgb(0xd8, 0xa6, 0x57),
            swapping: Color::Rgb(0xea, 0x69, 0x62),
            sorted: Color::Rgb(0xa9, 0xb6, 0x65),
            active: Color::Rgb(0xd3, 0x86, 0x9b),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            error: Color::Rgb(0xef, 0x44, 0x44),
            success: Color::Rgb(0x10, 0xb9, 0x81),
        }
    }
}

impl Theme {
    /// Default theme with user color overrides applied
    pub fn from_overrides(overrides: &ThemeColorOverrides) -> Self {
        let mut theme = Self::default();
        let slots: [(&Option<String>, &mut Color); 10] = [
            (&overrides.bg, &mut theme.bg0),
            (&overrides.fg, &mut theme.fg0),
            (&overrides.bar, &mut theme.bar),
            (&overrides.comparing, &mut theme.comparing),
            (&overrides.swapping, &mut theme.swapping),
            (&overrides.sorted, &mut theme.sorted),
            (&overrides.active, &mut theme.active),
            (&overrides.accent, &mut theme.accent),
            (&overrides.error, &mut theme.error),
            (&overrides.success, &mut theme.success),
        ];
        for (hex, slot) in slots {
            if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
                *slot = color;
            }
        }
        theme
    }

    /// Color for a bar given its tags.
    ///
    /// Swapping wins over comparing, which wins over active, which wins
    /// over sorted.
    pub fn bar_color(&self, tags: TagSet) -> Color {
        if tags.contains(Tag::Swapping) {
            self.swapping
        } else if tags.contains(Tag::Comparing) {
            self.comparing
        } else if tags.contains(Tag::Active) {
            self.active
        } else if tags.contains(Tag::Sorted) {
            self.sorted
        } else {
            self.bar
        }
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff5500"), Some(Color::Rgb(255, 85, 0)));
        assert_eq!(parse_hex_color("#f50"), Some(Color::Rgb(255, 85, 0)));
        assert_eq!(parse_hex_color("ff5500"), Some(Color::Rgb(255, 85, 0)));
        assert!(parse_hex_color("invalid").is_none());
        assert!(parse_hex_color("#gg0000").is_none());
    }

    #[test]
    fn test_overrides() {
        let overrides = ThemeColorOverrides {
            sorted: Some("#00ff00".to_string()),
            swapping: Some("not a color".to_string()),
            ..Default::default()
        };
        let theme = Theme::from_overrides(&overrides);
        assert_eq!(theme.sorted, Color::Rgb(0, 255, 0));
        assert_eq!(theme.swapping, Theme::default().swapping);
    }

    #[test]
    fn test_bar_color_precedence() {
        let theme = Theme::default();
        let mut tags = TagSet::default();
        assert_eq!(theme.bar_color(tags), theme.bar);
        tags.insert(Tag::Sorted);
        assert_eq!(theme.bar_color(tags), theme.sorted);
        tags.insert(Tag::Comparing);
        assert_eq!(theme.bar_color(tags), theme.comparing);
        tags.insert(Tag::Swapping);
        assert_eq!(theme.bar_color(tags), theme.swapping);
    }
}
