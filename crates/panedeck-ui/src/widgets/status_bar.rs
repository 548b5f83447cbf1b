//! Status bar widget
//!
//! The bar has three sections: the focused widget's title on the left, its
//! lifecycle state in the middle and key hints on the right.
//!
//! ```ignore
//! let status = StatusBar::new(&theme)
//!     .left("README")
//!     .center("active")
//!     .right("^hjkl:move 1-9:tab q:quit");
//! frame.render_widget(status, layout.status_bar);
//! ```

use panedeck_core::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Widget;

/// Status bar with left, center and right sections
pub struct StatusBar<'a> {
    left: &'a str,
    center: &'a str,
    right: &'a str,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Creates a status bar with empty sections
    pub fn new(theme: &'a Theme) -> Self {
        StatusBar {
            left: "",
            center: "",
            right: "",
            theme,
        }
    }

    /// Sets the left section, drawn bold in the accent colour
    pub fn left(mut self, text: &'a str) -> Self {
        self.left = text;
        self
    }

    /// Sets the centered section
    pub fn center(mut self, text: &'a str) -> Self {
        self.center = text;
        self
    }

    /// Sets the right-aligned section, drawn muted
    pub fn right(mut self, text: &'a str) -> Self {
        self.right = text;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bg = self.theme.colors.selection;
        buf.set_style(area, Style::default().bg(bg));
        let width = area.width as usize;

        if !self.left.is_empty() {
            let text = format!(" {} ", self.left);
            let style = self.theme.active_border().bg(bg);
            buf.set_stringn(area.x, area.y, &text, width, style);
        }

        let center_width = Span::raw(self.center).width();
        if center_width > 0 && center_width < width {
            let x = area.x + ((width - center_width) / 2) as u16;
            let style = Style::default().fg(self.theme.colors.foreground).bg(bg);
            buf.set_string(x, area.y, self.center, style);
        }

        if !self.right.is_empty() {
            let text = format!(" {} ", self.right);
            let text_width = Span::raw(text.as_str()).width();
            if text_width <= width {
                let x = area.right().saturating_sub(text_width as u16);
                buf.set_string(x, area.y, &text, self.theme.muted().bg(bg));
            }
        }
    }
}
