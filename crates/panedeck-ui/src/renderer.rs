//! Frame layout and dashboard drawing
//!
//! The terminal is split into a tab bar, the widget grid and a status bar
//! via [`AppLayout`]. [`render_dashboard`] draws every widget of the
//! visible tab into the grid area.

use crate::widget_manager::{WidgetInstance, WidgetManager};
use panedeck_core::{LifecycleState, Theme, WidgetView};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Main application layout areas
///
/// ```text
/// +---------------------------------+
/// | Tab Bar (1 line)                |
/// +---------------------------------+
/// |                                 |
/// | Widget grid                     |
/// |                                 |
/// +---------------------------------+
/// | Status Bar (1 line)             |
/// +---------------------------------+
/// ```
///
/// # Example
///
/// ```
/// use panedeck_ui::renderer::AppLayout;
/// use ratatui::prelude::Rect;
///
/// let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
///
/// assert_eq!(layout.tab_bar, Rect::new(0, 0, 80, 1));
/// assert_eq!(layout.content, Rect::new(0, 1, 80, 22));
/// assert_eq!(layout.status_bar, Rect::new(0, 23, 80, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppLayout {
    pub tab_bar: Rect,
    /// Area handed to the grid resolver
    pub content: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    /// Splits `area` into the three regions.
    ///
    /// Below three lines the bars are dropped and the grid gets everything.
    #[must_use]
    pub fn new(area: Rect) -> Self {
        if area.height < 3 {
            return AppLayout {
                tab_bar: Rect::default(),
                content: area,
                status_bar: Rect::default(),
            };
        }

        AppLayout {
            tab_bar: Rect::new(area.x, area.y, area.width, 1),
            content: Rect::new(area.x, area.y + 1, area.width, area.height - 2),
            status_bar: Rect::new(area.x, area.bottom() - 1, area.width, 1),
        }
    }

    /// Grid size for a terminal of `width x height` cells.
    ///
    /// ```
    /// use panedeck_ui::renderer::AppLayout;
    ///
    /// assert_eq!(AppLayout::grid_size(120, 40), (120, 38));
    /// assert_eq!(AppLayout::grid_size(10, 2), (10, 2));
    /// ```
    #[must_use]
    pub fn grid_size(width: u16, height: u16) -> (u16, u16) {
        let content = Self::new(Rect::new(0, 0, width, height)).content;
        (content.width, content.height)
    }
}

/// Draws the widgets of the visible tab into `area`.
pub fn render_dashboard(frame: &mut Frame, area: Rect, manager: &WidgetManager, theme: &Theme) {
    for instance in manager.visible() {
        let target = instance.rect().to_screen(area);
        if target.is_empty() {
            continue;
        }
        render_instance(frame, target, instance, theme);
    }
}

fn render_instance(frame: &mut Frame, area: Rect, instance: &WidgetInstance, theme: &Theme) {
    let state = instance.state();
    let border = match state {
        LifecycleState::Active => theme.active_border(),
        _ => theme.inactive_border(),
    };
    let title = match state {
        LifecycleState::Uninitialized | LifecycleState::Disabled => {
            format!(" {} ({}) ", instance.title(), state)
        }
        _ => format!(" {} ", instance.title()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.borders.border_type())
        .border_style(border)
        .title(Span::styled(title, border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state {
        LifecycleState::Uninitialized => {
            frame.render_widget(Paragraph::new("loading...").style(theme.muted()), inner);
        }
        LifecycleState::Disabled => {
            frame.render_widget(
                Paragraph::new(format!("{} is unavailable", instance.kind())).style(theme.error()),
                inner,
            );
        }
        _ => {
            let view = WidgetView { state, theme };
            instance.widget().render(frame, inner, &view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_layout_standard() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.tab_bar.height, 1);
        assert_eq!(layout.content.height, 22);
        assert_eq!(layout.status_bar.y, 23);
    }

    #[test]
    fn test_app_layout_with_offset() {
        let layout = AppLayout::new(Rect::new(5, 3, 40, 10));
        assert_eq!(layout.tab_bar, Rect::new(5, 3, 40, 1));
        assert_eq!(layout.content, Rect::new(5, 4, 40, 8));
        assert_eq!(layout.status_bar, Rect::new(5, 12, 40, 1));
    }

    #[test]
    fn test_app_layout_tiny_terminal() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 2));
        assert_eq!(layout.content, Rect::new(0, 0, 80, 2));
        assert!(layout.tab_bar.is_empty());
        assert!(layout.status_bar.is_empty());
    }

    #[test]
    fn test_app_layout_exactly_three_lines() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 3));
        assert_eq!(layout.content.height, 1);
    }

    #[test]
    fn test_grid_size_matches_content() {
        assert_eq!(AppLayout::grid_size(80, 24), (80, 22));
        assert_eq!(AppLayout::grid_size(0, 0), (0, 0));
    }
}
