//! `tail_file` widget
//!
//! Follows a growing file, `tail -f` style, for the lifetime of the
//! dashboard. Large files are opened near their end.

use crate::text::{render_lines, Highlight, Scroll};
use crossterm::event::KeyEvent;
use panedeck_core::{
    InitContext, InitFuture, InitOutcome, Message, Widget, WidgetError, WidgetKind, WidgetView,
};
use parking_lot::Mutex;
use ratatui::prelude::*;
use std::collections::VecDeque;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

/// Files larger than this are not read from the start.
pub const SEEK_THRESHOLD: u64 = 3000;
/// How far before the end a large file is opened.
pub const SEEK_BACK: u64 = 2500;
/// Lines kept in memory.
pub const MAX_LINES: usize = 1000;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Byte offset to start reading from, and whether the first line read
/// is a fragment to drop.
///
/// ```
/// use panedeck_widgets::tail_file::start_offset;
///
/// assert_eq!(start_offset(1200), (0, false));
/// assert_eq!(start_offset(10_000), (7_500, true));
/// ```
#[must_use]
pub fn start_offset(len: u64) -> (u64, bool) {
    if len > SEEK_THRESHOLD {
        (len - SEEK_BACK, true)
    } else {
        (0, false)
    }
}

/// Bounded line buffer fed with raw chunks of the file
#[derive(Debug, Clone)]
pub struct TailBuffer {
    lines: VecDeque<String>,
    partial: String,
    skip_fragment: bool,
    capacity: usize,
}

impl Default for TailBuffer {
    fn default() -> Self {
        Self::new(MAX_LINES)
    }
}

impl TailBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        TailBuffer {
            lines: VecDeque::new(),
            partial: String::new(),
            skip_fragment: false,
            capacity,
        }
    }

    /// Drops everything up to the next newline.
    pub fn skip_fragment(&mut self) {
        self.skip_fragment = true;
    }

    /// Appends raw text; only complete lines become visible.
    pub fn push_chunk(&mut self, chunk: &str) {
        self.partial.push_str(chunk);
        while let Some(end) = self.partial.find('\n') {
            let mut line: String = self.partial.drain(..=end).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            if self.skip_fragment {
                self.skip_fragment = false;
                continue;
            }
            self.push_line(line);
        }
    }

    /// Adds a line that is not part of the file, such as a notice.
    pub fn push_line(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Forgets buffered text after the file was truncated.
    pub fn reset(&mut self) {
        self.partial.clear();
        self.skip_fragment = false;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Live view of the end of a file
pub struct TailFileWidget {
    path: PathBuf,
    buffer: Arc<Mutex<TailBuffer>>,
    scroll: Scroll,
}

impl TailFileWidget {
    pub fn new(path: PathBuf) -> Self {
        TailFileWidget {
            path,
            buffer: Arc::new(Mutex::new(TailBuffer::default())),
            scroll: Scroll::following(),
        }
    }

    /// Lines currently buffered.
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lock().lines().map(str::to_string).collect()
    }
}

/// Reads from `position` to the current end of the file.
async fn read_from(path: &Path, position: u64, buffer: &Mutex<TailBuffer>) -> std::io::Result<u64> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(position)).await?;
    let mut bytes = Vec::new();
    let read = file.read_to_end(&mut bytes).await?;
    buffer.lock().push_chunk(&String::from_utf8_lossy(&bytes));
    Ok(position + read as u64)
}

async fn follow(
    path: PathBuf,
    buffer: Arc<Mutex<TailBuffer>>,
    ctx: InitContext,
) -> Result<(), WidgetError> {
    let len = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            buffer
                .lock()
                .push_line(format!("{} does not exist", path.display()));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let (start, fragment) = start_offset(len);
    if fragment {
        buffer.lock().skip_fragment();
    }
    let mut position = read_from(&path, start, &buffer).await?;
    ctx.signal_ready();

    loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        let len = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                debug!(path = %path.display(), %err, "tailed file unavailable");
                continue;
            }
        };
        if len < position {
            debug!(path = %path.display(), "tailed file truncated");
            buffer.lock().reset();
            position = 0;
        }
        if len > position {
            match read_from(&path, position, &buffer).await {
                Ok(next) => position = next,
                Err(err) => debug!(path = %path.display(), %err, "reading tailed file failed"),
            }
        }
    }
}

impl Widget for TailFileWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TailFile
    }

    fn init(&mut self, ctx: InitContext) -> InitOutcome {
        let task: InitFuture = Box::pin(follow(self.path.clone(), Arc::clone(&self.buffer), ctx));
        InitOutcome::Deferred(task)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let total = self.buffer.lock().len();
        self.scroll.handle_key(key, total);
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let mut buffer = self.buffer.lock();
        let lines: &[String] = buffer.lines.make_contiguous();
        render_lines(frame, area, lines, self.scroll, Highlight::Log, view.theme);
    }
}
