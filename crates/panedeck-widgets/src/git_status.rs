//! `git_status` widget
//!
//! Lists the working-tree changes of the repository the dashboard
//! configuration lives in and refreshes them periodically.

use crate::error::GitResult;
use crate::repo::{FileStatus, GitRepo, StatusEntry};
use crate::text::Scroll;
use crossterm::event::KeyEvent;
use panedeck_core::{
    InitContext, InitFuture, InitOutcome, Message, Theme, Widget, WidgetError, WidgetKind,
    WidgetView,
};
use parking_lot::Mutex;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Row, Table, TableState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Interval between two status reads.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Result of one status read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitSnapshot {
    pub branch: String,
    pub entries: Vec<StatusEntry>,
}

/// Reads branch and status on the blocking pool.
pub async fn read_snapshot(dir: PathBuf) -> Result<GitSnapshot, WidgetError> {
    let read = tokio::task::spawn_blocking(move || -> GitResult<GitSnapshot> {
        let repo = GitRepo::open(&dir)?;
        Ok(GitSnapshot {
            branch: repo.current_branch()?,
            entries: repo.status()?,
        })
    })
    .await
    .map_err(|err| WidgetError::Unavailable(format!("git status task ({err})")))?;
    Ok(read?)
}

async fn watch(
    dir: PathBuf,
    snapshot: Arc<Mutex<GitSnapshot>>,
    ctx: InitContext,
) -> Result<(), WidgetError> {
    *snapshot.lock() = read_snapshot(dir.clone()).await?;
    ctx.signal_ready();
    loop {
        tokio::time::sleep(REFRESH_INTERVAL).await;
        match read_snapshot(dir.clone()).await {
            Ok(next) => *snapshot.lock() = next,
            Err(err) => debug!(%err, "git status refresh failed"),
        }
    }
}

/// Working-tree status table
pub struct GitStatusWidget {
    dir: PathBuf,
    snapshot: Arc<Mutex<GitSnapshot>>,
    scroll: Scroll,
}

impl GitStatusWidget {
    /// Watches the repository containing `dir`.
    pub fn new(dir: PathBuf) -> Self {
        GitStatusWidget {
            dir,
            snapshot: Arc::new(Mutex::new(GitSnapshot::default())),
            scroll: Scroll::default(),
        }
    }

    pub fn snapshot(&self) -> GitSnapshot {
        self.snapshot.lock().clone()
    }
}

fn row_style(entry: &StatusEntry, theme: &Theme) -> Style {
    if entry.staged {
        Style::default().fg(theme.colors.success)
    } else if entry.status == FileStatus::Untracked {
        theme.muted()
    } else if entry.status == FileStatus::Conflicted {
        theme.error()
    } else {
        Style::default().fg(theme.colors.warning)
    }
}

impl Widget for GitStatusWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::GitStatus
    }

    fn init(&mut self, ctx: InitContext) -> InitOutcome {
        let task: InitFuture = Box::pin(watch(self.dir.clone(), Arc::clone(&self.snapshot), ctx));
        InitOutcome::Deferred(task)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let total = self.snapshot.lock().entries.len();
        self.scroll.handle_key(key, total);
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let theme = view.theme;
        let snapshot = self.snapshot.lock();
        let [branch_area, table_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        let branch = Line::from(vec![
            Span::styled("on ", theme.muted()),
            Span::styled(snapshot.branch.as_str(), theme.info().add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(branch), branch_area);

        if snapshot.entries.is_empty() {
            frame.render_widget(
                Paragraph::new("nothing to commit, working tree clean").style(theme.muted()),
                table_area,
            );
            return;
        }

        let rows = snapshot.entries.iter().map(|entry| {
            let stage = if entry.staged { "staged" } else { "unstaged" };
            Row::new([
                stage.to_string(),
                entry.status.to_string(),
                entry.path.display().to_string(),
            ])
            .style(row_style(entry, theme))
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(9),
                Constraint::Length(11),
                Constraint::Min(10),
            ],
        )
        .header(Row::new(["STAGE", "STATUS", "PATH"]).style(theme.info()));

        let visible = table_area.height.saturating_sub(1) as usize;
        let mut state =
            TableState::default().with_offset(self.scroll.first_visible(snapshot.entries.len(), visible));
        frame.render_stateful_widget(table, table_area, &mut state);
    }
}
