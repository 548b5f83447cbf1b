//! `note` and `text_file` widgets
//!
//! Both show static text: a note carries it inline in the configuration,
//! a text file reads it once at startup.

use crate::text::{render_lines, Highlight, Scroll};
use crossterm::event::KeyEvent;
use panedeck_core::{
    InitContext, InitFuture, InitOutcome, Message, Widget, WidgetError, WidgetKind, WidgetView,
};
use parking_lot::Mutex;
use ratatui::prelude::*;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Source {
    Inline(String),
    File(PathBuf),
}

/// Scrollable static text
pub struct NoteWidget {
    source: Source,
    lines: Arc<Mutex<Vec<String>>>,
    scroll: Scroll,
}

impl NoteWidget {
    /// A note showing `text`.
    pub fn inline(text: &str) -> Self {
        Self::with_source(Source::Inline(text.to_string()))
    }

    /// A panel showing the contents of `path`.
    pub fn file(path: PathBuf) -> Self {
        Self::with_source(Source::File(path))
    }

    fn with_source(source: Source) -> Self {
        NoteWidget {
            source,
            lines: Arc::new(Mutex::new(Vec::new())),
            scroll: Scroll::default(),
        }
    }

    /// Lines currently shown.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

impl Widget for NoteWidget {
    fn kind(&self) -> WidgetKind {
        match self.source {
            Source::Inline(_) => WidgetKind::Note,
            Source::File(_) => WidgetKind::TextFile,
        }
    }

    fn init(&mut self, _ctx: InitContext) -> InitOutcome {
        match &self.source {
            Source::Inline(text) => {
                *self.lines.lock() = split_lines(text);
                InitOutcome::Ready
            }
            Source::File(path) => {
                let path = path.clone();
                let lines = Arc::clone(&self.lines);
                let task: InitFuture = Box::pin(async move {
                    let loaded = match tokio::fs::read_to_string(&path).await {
                        Ok(text) => split_lines(&text),
                        Err(err) if err.kind() == ErrorKind::NotFound => {
                            vec![format!("{} does not exist", path.display())]
                        }
                        Err(err) => return Err(WidgetError::Io(err)),
                    };
                    tracing::debug!(path = %path.display(), lines = loaded.len(), "loaded text file");
                    *lines.lock() = loaded;
                    Ok(())
                });
                InitOutcome::Deferred(task)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let total = self.lines.lock().len();
        self.scroll.handle_key(key, total);
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let lines = self.lines.lock();
        render_lines(frame, area, lines.as_slice(), self.scroll, Highlight::Markdown, view.theme);
    }
}
