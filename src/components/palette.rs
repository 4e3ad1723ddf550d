//! Colours for the light and dark themes

use crate::model::theme::Theme;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub selected: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::Rgb(245, 246, 250),
                text: Color::Rgb(44, 62, 80),
                muted: Color::Rgb(127, 140, 141),
                border: Color::Rgb(189, 195, 199),
                accent: Color::Rgb(102, 126, 234),
                selected: Color::Rgb(118, 75, 162),
                success: Color::Rgb(39, 174, 96),
                error: Color::Rgb(231, 76, 60),
                warning: Color::Rgb(211, 84, 0),
            },
            Theme::Dark => Self {
                background: Color::Rgb(26, 26, 46),
                text: Color::Rgb(234, 234, 234),
                muted: Color::Rgb(142, 142, 147),
                border: Color::Rgb(72, 72, 96),
                accent: Color::Rgb(130, 150, 255),
                selected: Color::Rgb(187, 134, 252),
                success: Color::Rgb(46, 204, 113),
                error: Color::Rgb(255, 107, 107),
                warning: Color::Rgb(241, 196, 15),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

/// Parse a `#rrggbb` colour
pub fn hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
