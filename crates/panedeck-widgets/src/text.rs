//! Scrollable text panels shared by the text-based widgets
//!
//! Lines are highlighted with one of two [`Highlight`] rules: markdown-ish
//! notes get their headings and rules coloured, logs get error words and
//! timestamps coloured.

use crossterm::event::{KeyCode, KeyEvent};
use once_cell::sync::Lazy;
use panedeck_core::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use regex::Regex;

static ERROR_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:error|Error|ERROR)\b").expect("error pattern is valid"));

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}[-/]\d{2}[-/]\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2})?)?|\b\d{2}:\d{2}:\d{2}\b")
        .expect("timestamp pattern is valid")
});

/// How lines of a panel are coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// `#` headings and `---` rules
    Markdown,
    /// Error words and timestamps
    Log,
}

impl Highlight {
    /// Styles a single line.
    pub fn line<'a>(self, text: &'a str, theme: &Theme) -> Line<'a> {
        match self {
            Highlight::Markdown => markdown_line(text, theme),
            Highlight::Log => log_line(text, theme),
        }
    }
}

fn markdown_line<'a>(text: &'a str, theme: &Theme) -> Line<'a> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('#') {
        Line::styled(text, theme.info().add_modifier(Modifier::BOLD))
    } else if trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-') {
        Line::styled(text, theme.muted())
    } else {
        Line::styled(text, theme.text())
    }
}

fn log_line<'a>(text: &'a str, theme: &Theme) -> Line<'a> {
    let mut marks: Vec<(usize, usize, Style)> = ERROR_WORD
        .find_iter(text)
        .map(|m| (m.start(), m.end(), theme.error().add_modifier(Modifier::BOLD)))
        .chain(
            TIMESTAMP
                .find_iter(text)
                .map(|m| (m.start(), m.end(), theme.info())),
        )
        .collect();
    marks.sort_by_key(|(start, _, _)| *start);

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end, style) in marks {
        if start < cursor {
            continue;
        }
        if start > cursor {
            spans.push(Span::styled(&text[cursor..start], theme.text()));
        }
        spans.push(Span::styled(&text[start..end], style));
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(Span::styled(&text[cursor..], theme.text()));
    }
    Line::from(spans)
}

/// Scroll position of a panel.
///
/// The offset is clamped when drawing, since only then is the visible
/// height known. `follow` keeps the view pinned to the last line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    pub offset: usize,
    pub follow: bool,
}

impl Scroll {
    /// Scroll pinned to the bottom, for live feeds.
    #[must_use]
    pub fn following() -> Self {
        Scroll {
            offset: 0,
            follow: true,
        }
    }

    /// Applies a scroll key. Returns `false` for keys that do not scroll.
    pub fn handle_key(&mut self, key: KeyEvent, total: usize) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.offset = (self.offset + 1).min(total.saturating_sub(1));
                self.follow = false;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.offset = self.offset.saturating_sub(1);
                self.follow = false;
            }
            KeyCode::PageDown => {
                self.offset = (self.offset + 10).min(total.saturating_sub(1));
                self.follow = false;
            }
            KeyCode::PageUp => {
                self.offset = self.offset.saturating_sub(10);
                self.follow = false;
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.offset = 0;
                self.follow = false;
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.offset = total.saturating_sub(1);
                self.follow = true;
            }
            _ => return false,
        }
        true
    }

    /// First visible line for `total` lines in a panel `height` rows high.
    #[must_use]
    pub fn first_visible(&self, total: usize, height: usize) -> usize {
        let last_page = total.saturating_sub(height);
        if self.follow {
            last_page
        } else {
            self.offset.min(last_page)
        }
    }
}

/// Draws `lines` into `area` starting at the scroll position.
pub fn render_lines<S: AsRef<str>>(
    frame: &mut Frame,
    area: Rect,
    lines: &[S],
    scroll: Scroll,
    highlight: Highlight,
    theme: &Theme,
) {
    let first = scroll.first_visible(lines.len(), area.height as usize);
    let visible: Vec<Line> = lines
        .iter()
        .skip(first)
        .take(area.height as usize)
        .map(|line| highlight.line(line.as_ref(), theme))
        .collect();
    frame.render_widget(Paragraph::new(visible).wrap(Wrap { trim: false }), area);
}
