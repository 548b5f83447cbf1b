//! Tab bar widget
//!
//! Tabs are numbered from 1 so the label matches the key that selects
//! them. The visible tab uses the theme's highlight style.
//!
//! ```ignore
//! let bar = TabBar::new(&["main", "logs"], Some(0), &theme);
//! frame.render_widget(bar, layout.tab_bar);
//! ```

use panedeck_core::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Tabs, Widget};

/// Horizontal list of tab names
pub struct TabBar<'a> {
    names: &'a [&'a str],
    active: Option<usize>,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    /// Creates a tab bar; `active` is `None` before the first switch.
    pub fn new(names: &'a [&'a str], active: Option<usize>, theme: &'a Theme) -> Self {
        TabBar {
            names,
            active,
            theme,
        }
    }

    /// Label shown for the tab at `index`.
    ///
    /// ```
    /// use panedeck_ui::widgets::TabBar;
    ///
    /// assert_eq!(TabBar::label(0, "main"), " 1.main ");
    /// ```
    #[must_use]
    pub fn label(index: usize, name: &str) -> String {
        format!(" {}.{} ", index + 1, name)
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.names.is_empty() || area.height == 0 {
            return;
        }

        let titles: Vec<Line> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let style = if Some(i) == self.active {
                    self.theme.highlight()
                } else {
                    self.theme.muted()
                };
                Line::styled(Self::label(i, name), style)
            })
            .collect();

        Tabs::new(titles)
            .select(self.active)
            .divider("|")
            .padding("", "")
            .style(Style::default().bg(self.theme.colors.background))
            .render(area, buf);
    }
}
