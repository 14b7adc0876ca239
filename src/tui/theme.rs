use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::todo::Priority;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub cursor_bg: Color,
    pub cursor_border: Color,
    /// Calendar cell of the day picked as the list filter
    pub selected_day_bg: Color,
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
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            cursor_bg: Color::Rgb(0x3D, 0x14, 0x38),
            cursor_border: Color::Rgb(0xFB, 0x41, 0x96),
            selected_day_bg: Color::Rgb(0x1E, 0x3A, 0x5F),
        }
    }
}

/// `#RRGGBB` to an RGB color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let [_, r, g, b] = value.to_be_bytes();
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// The color behind a `[ui.colors]` key
    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        let slot = match key {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "cursor_bg" => &mut self.cursor_bg,
            "cursor_border" => &mut self.cursor_border,
            "selected_day_bg" => &mut self.selected_day_bg,
            _ => return None,
        };
        Some(slot)
    }

    /// Defaults with the site's `[ui.colors]` applied. Unknown keys and
    /// malformed values are logged and skipped.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            match (parse_hex_color(value), theme.slot(key)) {
                (Some(color), Some(slot)) => *slot = color,
                (None, _) => {
                    log::warn!("event=theme_color key={} status=invalid value={}", key, value)
                }
                (_, None) => log::warn!("event=theme_color key={} status=unknown", key),
            }
        }
        theme
    }

    /// Color of a task's priority marker
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.green,
        }
    }
}
