//! Widget trait and lifecycle types.
//!
//! Every widget kind implements [`Widget`]. The manager owns one boxed
//! widget per layout slot and drives it through the lifecycle:
//!
//! ```text
//! Uninitialized --init--> Ready <--activate/deactivate--> Active/Inactive
//!        \                  |
//!         `------------- Disabled (terminal)
//! ```
//!
//! Initialization may run on the tokio runtime. Readiness is published
//! through a [`WidgetStatus`], an atomic flag shared between the widget's
//! task and the UI thread, so the UI never blocks on a widget.

use crate::config::WidgetKind;
use crate::event::{Message, MessageBus};
use crate::geometry::SlotIndex;
use crate::theme::Theme;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Why a widget could not initialize.
///
/// Widget errors never stop the dashboard; the widget is disabled instead.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Reading a file or spawning a process failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// An external service or tool is missing or refused access.
    #[error("{0} is unavailable")]
    Unavailable(String),

    /// The widget's own configuration cannot be used.
    #[error("invalid widget settings: {0}")]
    Invalid(String),
}

const UNINITIALIZED: u8 = 0;
const READY: u8 = 1;
const DISABLED: u8 = 2;

/// Shared readiness flag of one widget instance.
///
/// Cloning shares the flag. `Disabled` is terminal: once disabled a widget
/// never becomes ready again.
///
/// # Examples
///
/// ```
/// use panedeck_core::WidgetStatus;
///
/// let status = WidgetStatus::new();
/// let task_side = status.clone();
/// assert!(task_side.mark_ready());
/// assert!(status.is_ready());
///
/// status.disable();
/// assert!(!task_side.mark_ready());
/// assert!(status.is_disabled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WidgetStatus(Arc<AtomicU8>);

impl WidgetStatus {
    /// A fresh, uninitialized status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `Uninitialized -> Ready`.
    ///
    /// Returns `true` only for the call that made the transition.
    pub fn mark_ready(&self) -> bool {
        self.0
            .compare_exchange(UNINITIALIZED, READY, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Moves to `Disabled` from any state.
    ///
    /// Returns `true` if the widget was not disabled before.
    pub fn disable(&self) -> bool {
        self.0.swap(DISABLED, Ordering::AcqRel) != DISABLED
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire) == READY
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.0.load(Ordering::Acquire) == DISABLED
    }
}

/// Lifecycle state of a widget instance as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    /// Initialized but never focused.
    Ready,
    /// Holds focus.
    Active,
    /// Held focus before.
    Inactive,
    Disabled,
}

impl LifecycleState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "loading",
            LifecycleState::Ready => "ready",
            LifecycleState::Active => "active",
            LifecycleState::Inactive => "inactive",
            LifecycleState::Disabled => "disabled",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle given to a widget when it is initialized.
///
/// It can be moved into background tasks. Long-running feeds call
/// [`InitContext::signal_ready`] as soon as their first content is in and
/// keep streaming afterwards.
#[derive(Debug, Clone)]
pub struct InitContext {
    index: SlotIndex,
    status: WidgetStatus,
    bus: MessageBus,
}

impl InitContext {
    pub fn new(index: SlotIndex, status: WidgetStatus, bus: MessageBus) -> Self {
        Self { index, status, bus }
    }

    /// Slot index of the widget being initialized.
    #[must_use]
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    /// Shared status flag of the widget.
    #[must_use]
    pub fn status(&self) -> &WidgetStatus {
        &self.status
    }

    /// Marks the widget ready and notifies the coordinator.
    ///
    /// Repeated calls are harmless.
    pub fn signal_ready(&self) {
        if self.status.mark_ready() {
            // Nobody listening just means the UI has not subscribed yet;
            // it will still see the flag on its next tick.
            let _ = self.bus.send(Message::WidgetReady(self.index));
        }
    }

    /// Disables the widget for good and notifies the coordinator.
    pub fn signal_disabled(&self, reason: &WidgetError) {
        if self.status.disable() {
            tracing::warn!(widget = self.index, %reason, "widget disabled");
            let _ = self.bus.send(Message::WidgetDisabled(self.index));
        }
    }
}

/// Future returned by widgets whose initialization performs I/O.
pub type InitFuture = Pin<Box<dyn Future<Output = Result<(), WidgetError>> + Send + 'static>>;

/// Result of [`Widget::init`].
pub enum InitOutcome {
    /// Initialization finished synchronously.
    Ready,
    /// Initialization continues on the runtime; the widget is ready when
    /// the future resolves with `Ok` (or earlier, via
    /// [`InitContext::signal_ready`]).
    Deferred(InitFuture),
    /// Initialization failed; the widget is disabled.
    Failed(WidgetError),
}

impl fmt::Debug for InitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitOutcome::Ready => f.write_str("Ready"),
            InitOutcome::Deferred(_) => f.write_str("Deferred(..)"),
            InitOutcome::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// What a widget needs to know to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct WidgetView<'a> {
    pub state: LifecycleState,
    pub theme: &'a Theme,
}

impl WidgetView<'_> {
    /// `true` when the widget holds focus.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }
}

/// Trait that all widget kinds implement.
///
/// The manager never inspects widget content; it only calls the methods
/// below. Widgets are used from the UI thread, so there is no `Send`
/// requirement on the widget itself, only on the future returned from
/// [`Widget::init`].
///
/// # Example
///
/// ```ignore
/// use panedeck_core::{InitContext, InitOutcome, Widget, WidgetKind, WidgetView};
/// use ratatui::prelude::*;
///
/// struct Hello;
///
/// impl Widget for Hello {
///     fn kind(&self) -> WidgetKind { WidgetKind::Note }
///     fn init(&mut self, _ctx: InitContext) -> InitOutcome { InitOutcome::Ready }
///     fn render(&self, frame: &mut Frame, area: Rect, _view: &WidgetView<'_>) {
///         frame.render_widget("hello", area);
///     }
/// }
/// ```
pub trait Widget {
    /// The kind this widget was built from.
    fn kind(&self) -> WidgetKind;

    /// Starts initialization.
    ///
    /// Called exactly once, before the widget is first shown. Widgets
    /// that need I/O return [`InitOutcome::Deferred`] so the work runs on
    /// the runtime instead of the UI thread.
    fn init(&mut self, ctx: InitContext) -> InitOutcome;

    /// Called when the widget receives focus.
    fn activate(&mut self) {}

    /// Called when the widget loses focus.
    fn deactivate(&mut self) {}

    /// Handles a key the dashboard did not claim.
    ///
    /// Only the active widget receives keys. A returned message is
    /// dispatched by the coordinator.
    fn handle_key(&mut self, _key: KeyEvent) -> Option<Message> {
        None
    }

    /// Optional per-tick update.
    fn tick(&mut self) {}

    /// Draws the widget content inside `area`.
    ///
    /// The frame border and title are drawn by the dashboard; `area` is
    /// the inner region.
    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Toggle {
        active: bool,
    }

    impl Widget for Toggle {
        fn kind(&self) -> WidgetKind {
            WidgetKind::Note
        }

        fn init(&mut self, _ctx: InitContext) -> InitOutcome {
            InitOutcome::Ready
        }

        fn activate(&mut self) {
            self.active = true;
        }

        fn deactivate(&mut self) {
            self.active = false;
        }

        fn render(&self, _frame: &mut Frame, _area: Rect, _view: &WidgetView<'_>) {}
    }

    #[test]
    fn test_widget_trait_is_object_safe() {
        let mut widget: Box<dyn Widget> = Box::new(Toggle { active: false });
        widget.activate();
        assert!(widget.handle_key(KeyEvent::from(crossterm::event::KeyCode::Enter)).is_none());
        widget.deactivate();
        assert_eq!(widget.kind(), WidgetKind::Note);
    }

    #[test]
    fn test_status_ready_only_once() {
        let status = WidgetStatus::new();
        assert!(!status.is_ready());
        assert!(status.mark_ready());
        assert!(!status.mark_ready());
        assert!(status.is_ready());
    }

    #[test]
    fn test_status_disable_is_terminal() {
        let status = WidgetStatus::new();
        assert!(status.disable());
        assert!(!status.disable());
        assert!(!status.mark_ready());
        assert!(status.is_disabled());
        assert!(!status.is_ready());
    }

    #[test]
    fn test_ready_widget_can_be_disabled() {
        let status = WidgetStatus::new();
        status.mark_ready();
        assert!(status.disable());
        assert!(!status.is_ready());
    }

    #[tokio::test]
    async fn test_signal_ready_notifies_once() {
        let bus = MessageBus::new(8);
        let mut rx = bus.subscribe();
        let ctx = InitContext::new(4, WidgetStatus::new(), bus);
        ctx.signal_ready();
        ctx.signal_ready();
        assert_eq!(rx.recv().await.unwrap(), Message::WidgetReady(4));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_signal_disabled_from_task() {
        let bus = MessageBus::new(8);
        let mut rx = bus.subscribe();
        let status = WidgetStatus::new();
        let ctx = InitContext::new(1, status.clone(), bus);
        tokio::spawn(async move {
            ctx.signal_disabled(&WidgetError::Unavailable("docker".into()));
        })
        .await
        .unwrap();
        assert!(status.is_disabled());
        assert_eq!(rx.recv().await.unwrap(), Message::WidgetDisabled(1));
    }

    #[test]
    fn test_lifecycle_labels() {
        assert_eq!(LifecycleState::Uninitialized.to_string(), "loading");
        assert_eq!(LifecycleState::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_widget_error_display() {
        let err = WidgetError::Unavailable("GITHUB_TOKEN".into());
        assert_eq!(err.to_string(), "GITHUB_TOKEN is unavailable");
    }
}
