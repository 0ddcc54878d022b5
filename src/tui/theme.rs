// Theme system for the chat panel
//
// Each theme defines colors for all UI elements. Themes can be switched at
// runtime with Ctrl+T.

use ratatui::style::{Color, Modifier, Style};

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Dark, ThemeKind::Light]
    }

    /// Parse a configured theme name; unknown names fall back to Dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }

    /// Get the next theme in the cycle
    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

/// Colors for every element of the chat panel
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub border: Color,
    pub title: Color,
    /// Speaker label and text of user entries
    pub user: Color,
    /// Speaker label of tutor entries
    pub tutor: Color,
    pub code: Color,
    pub muted: Color,
    pub highlight: Color,
    pub error: Color,
    pub warn: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::Gray,
            border: Color::DarkGray,
            title: Color::Cyan,
            user: Color::LightBlue,
            tutor: Color::LightGreen,
            code: Color::Yellow,
            muted: Color::DarkGray,
            highlight: Color::Cyan,
            error: Color::LightRed,
            warn: Color::Yellow,
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            border: Color::Gray,
            title: Color::Blue,
            user: Color::Blue,
            tutor: Color::Green,
            code: Color::Magenta,
            muted: Color::DarkGray,
            highlight: Color::Blue,
            error: Color::Red,
            warn: Color::Rgb(180, 120, 0),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code)
    }

    pub fn label(&self, color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
