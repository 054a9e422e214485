use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Light or dark colour scheme
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Header button label: shows the mode a press switches to
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "🌞",
            ThemeMode::Light => "🌙",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeMode::Dark => Palette {
                background: Color::Rgb(17, 27, 33),
                surface: Color::Rgb(32, 44, 51),
                text: Color::Rgb(233, 237, 239),
                muted: Color::DarkGray,
                accent: Color::Rgb(0, 168, 132),
                user: Color::Rgb(0, 92, 75),
                bot: Color::Rgb(32, 44, 51),
                border: Color::Rgb(55, 70, 79),
            },
            ThemeMode::Light => Palette {
                background: Color::Rgb(240, 242, 245),
                surface: Color::White,
                text: Color::Rgb(17, 27, 33),
                muted: Color::Gray,
                accent: Color::Rgb(0, 128, 105),
                user: Color::Rgb(217, 253, 211),
                bot: Color::White,
                border: Color::Rgb(200, 205, 210),
            },
        }
    }
}

/// Colours used by every widget for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub bot: Color,
    pub border: Color,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn panel(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn button(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}
