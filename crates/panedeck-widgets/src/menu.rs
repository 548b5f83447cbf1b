//! `menu` widget
//!
//! A table of commands. Pressing Enter on a row closes the dashboard and
//! runs the row's command in the shell.

use crossterm::event::{KeyCode, KeyEvent};
use panedeck_core::config::MenuEntry;
use panedeck_core::{
    InitContext, InitOutcome, LaunchRequest, Message, Widget, WidgetError, WidgetKind, WidgetView,
};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row, Table, TableState};

/// Command launcher
pub struct MenuWidget {
    entries: Vec<MenuEntry>,
    envs: Vec<(String, String)>,
    selected: usize,
    problem: Option<String>,
}

impl MenuWidget {
    /// A menu over `entries`; `envs` are added to launched commands.
    pub fn new(entries: Vec<MenuEntry>, envs: Vec<(String, String)>) -> Self {
        MenuWidget {
            entries,
            envs,
            selected: 0,
            problem: None,
        }
    }

    /// Builds a menu from decoded content; a decoding error disables the
    /// widget when it is initialized.
    pub fn from_content(
        content: Result<Vec<MenuEntry>, serde_json::Error>,
        envs: Vec<(String, String)>,
    ) -> Self {
        match content {
            Ok(entries) => Self::new(entries, envs),
            Err(err) => MenuWidget {
                problem: Some(format!("menu content: {err}")),
                ..Self::new(Vec::new(), envs)
            },
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&MenuEntry> {
        self.entries.get(self.selected)
    }
}

impl Widget for MenuWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Menu
    }

    fn init(&mut self, _ctx: InitContext) -> InitOutcome {
        match self.problem.take() {
            Some(problem) => InitOutcome::Failed(WidgetError::Invalid(problem)),
            None => InitOutcome::Ready,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let last = self.entries.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.selected = (self.selected + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = last,
            KeyCode::Enter => {
                let entry = self.selected()?;
                return Some(Message::Launch(LaunchRequest::new(
                    &entry.command,
                    self.envs.clone(),
                )));
            }
            _ => {}
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let theme = view.theme;
        let header = Row::new(["CATEGORY", "NAME", "DESCRIPTION"])
            .style(theme.info().add_modifier(Modifier::BOLD));
        let rows = self.entries.iter().map(|entry| {
            Row::new([
                Cell::from(entry.category.as_str()).style(theme.muted()),
                Cell::from(entry.name.as_str()),
                Cell::from(entry.description.as_str()),
            ])
            .style(theme.text())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(20),
                Constraint::Percentage(30),
                Constraint::Percentage(50),
            ],
        )
        .header(header)
        .row_highlight_style(theme.highlight());

        let mut state = TableState::default();
        if view.is_active() && !self.entries.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }
}
