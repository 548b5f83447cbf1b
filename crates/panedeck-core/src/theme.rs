//! Colour themes
//!
//! A theme is picked by name from the `theme` key of the configuration.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Complete theme definition
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme display name
    pub name: String,
    /// Color palette
    pub colors: ThemeColors,
    /// Border styling of widget frames
    pub borders: BorderStyle,
}

/// Color palette for the theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub background: Color,
    pub foreground: Color,
    /// Frame of the active widget, selected tab
    pub accent: Color,
    /// Cursor rows in lists
    pub selection: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    /// Dates, headings and other highlighted tokens
    pub info: Color,
    /// Inactive frames and secondary text
    pub muted: Color,
}

/// Border style for widget frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    Rounded,
    Plain,
    Double,
}

impl BorderStyle {
    /// The ratatui border type for this style.
    #[must_use]
    pub fn border_type(self) -> BorderType {
        match self {
            BorderStyle::Rounded => BorderType::Rounded,
            BorderStyle::Plain => BorderType::Plain,
            BorderStyle::Double => BorderType::Double,
        }
    }
}

impl Theme {
    /// Creates the default dark theme
    pub fn dark() -> Self {
        Theme {
            name: "dark".to_string(),
            colors: ThemeColors {
                background: Color::Reset,
                foreground: Color::Rgb(235, 219, 178),
                accent: Color::Rgb(250, 189, 47),
                selection: Color::Rgb(80, 73, 69),
                error: Color::Rgb(251, 73, 52),
                warning: Color::Rgb(254, 128, 25),
                success: Color::Rgb(184, 187, 38),
                info: Color::Rgb(131, 165, 152),
                muted: Color::Rgb(146, 131, 116),
            },
            borders: BorderStyle::Rounded,
        }
    }

    /// Creates a light theme
    pub fn light() -> Self {
        Theme {
            name: "light".to_string(),
            colors: ThemeColors {
                background: Color::Reset,
                foreground: Color::Rgb(60, 56, 54),
                accent: Color::Rgb(175, 58, 3),
                selection: Color::Rgb(213, 196, 161),
                error: Color::Rgb(157, 0, 6),
                warning: Color::Rgb(181, 118, 20),
                success: Color::Rgb(121, 116, 14),
                info: Color::Rgb(7, 102, 120),
                muted: Color::Rgb(124, 111, 100),
            },
            borders: BorderStyle::Plain,
        }
    }

    /// Looks up a built-in theme by its configuration name.
    ///
    /// ```
    /// use panedeck_core::Theme;
    ///
    /// assert_eq!(Theme::by_name("light").unwrap().name, "light");
    /// assert!(Theme::by_name("neon").is_none());
    /// ```
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Style for regular text
    pub fn text(&self) -> Style {
        Style::default().fg(self.colors.foreground).bg(self.colors.background)
    }

    /// Style for the frame of the focused widget
    pub fn active_border(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for frames of unfocused widgets
    pub fn inactive_border(&self) -> Style {
        Style::default().fg(self.colors.muted)
    }

    /// Style for highlighted items (selected tab, list cursor)
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .bg(self.colors.selection)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for error text
    pub fn error(&self) -> Style {
        Style::default().fg(self.colors.error)
    }

    /// Style for secondary text
    pub fn muted(&self) -> Style {
        Style::default().fg(self.colors.muted)
    }

    /// Style for highlighted tokens such as dates and headings
    pub fn info(&self) -> Style {
        Style::default().fg(self.colors.info)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
