//! Event and message system for the dashboard
//!
//! Keyboard input, terminal resizes and widget lifecycle notifications
//! all reach the coordinator as [`Message`]s. Widget initialization tasks
//! running on the tokio runtime report back through the [`MessageBus`].

use crossterm::event::KeyEvent;
use tokio::sync::broadcast;

use crate::error::CoreError;
use crate::geometry::{Direction, SlotIndex};

/// A shell command to run once the dashboard has closed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchRequest {
    /// Command line handed to `sh -c`.
    pub command: String,
    /// Extra environment variables for the command.
    pub envs: Vec<(String, String)>,
}

impl LaunchRequest {
    /// Creates a request for `command`, joining multi-line scripts with `; `.
    ///
    /// ```
    /// use panedeck_core::event::LaunchRequest;
    ///
    /// let req = LaunchRequest::new("cd src\nmake", Vec::new());
    /// assert_eq!(req.command, "cd src; make");
    /// ```
    pub fn new(command: &str, envs: Vec<(String, String)>) -> Self {
        let command = command
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        Self { command, envs }
    }
}

/// Messages that drive the dashboard
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Message {
    // === Navigation ===
    /// Switch to a tab by position
    SwitchTab(usize),
    /// Switch to the next tab, wrapping around
    NextTab,
    /// Switch to the previous tab, wrapping around
    PrevTab,
    /// Move focus to the neighboring widget
    Focus(Direction),

    // === Widget lifecycle ===
    /// A widget finished initializing
    WidgetReady(SlotIndex),
    /// A widget gave up and must not be focused again
    WidgetDisabled(SlotIndex),

    // === Global ===
    /// Close the dashboard and run a command in its place
    Launch(LaunchRequest),
    /// Quit the application
    Quit,
    /// Toggle help display
    ToggleHelp,

    // === Input ===
    /// Keyboard input event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),

    // === Batch ===
    /// Multiple messages to process in sequence
    Batch(Vec<Message>),

    // === No-op ===
    /// No operation (used for optional returns)
    #[default]
    None,
}

impl Message {
    /// Returns true if this is a no-op message
    ///
    /// # Example
    ///
    /// ```
    /// use panedeck_core::event::Message;
    ///
    /// assert!(Message::None.is_none());
    /// assert!(!Message::Quit.is_none());
    /// ```
    pub fn is_none(&self) -> bool {
        matches!(self, Message::None)
    }

    /// Flattens nested batch messages into a single level
    ///
    /// This method recursively flattens any nested `Message::Batch` variants
    /// and removes `Message::None` entries.
    ///
    /// # Example
    ///
    /// ```
    /// use panedeck_core::event::Message;
    ///
    /// let nested = Message::Batch(vec![
    ///     Message::Quit,
    ///     Message::Batch(vec![Message::NextTab, Message::PrevTab]),
    /// ]);
    /// let flat = nested.flatten();
    /// assert_eq!(flat.len(), 3);
    /// ```
    pub fn flatten(self) -> Vec<Message> {
        match self {
            Message::Batch(msgs) => msgs.into_iter().flat_map(|m| m.flatten()).collect(),
            Message::None => vec![],
            other => vec![other],
        }
    }
}

/// Input events from the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(event: crossterm::event::Event) -> Self {
        match event {
            crossterm::event::Event::Key(key) => InputEvent::Key(key),
            crossterm::event::Event::Resize(w, h) => InputEvent::Resize(w, h),
            _ => InputEvent::Tick,
        }
    }
}

impl From<InputEvent> for Message {
    fn from(event: InputEvent) -> Self {
        match event {
            InputEvent::Key(key) => Message::Key(key),
            InputEvent::Resize(w, h) => Message::Resize(w, h),
            InputEvent::Tick => Message::None,
        }
    }
}

/// Message bus for broadcasting messages to multiple subscribers
///
/// Widget tasks hold clones of the bus and publish lifecycle changes; the
/// coordinator subscribes once and drains the receiver on every tick.
///
/// # Example
///
/// ```
/// use panedeck_core::event::{Message, MessageBus};
///
/// let bus = MessageBus::new(100);
/// let mut rx = bus.subscribe();
/// bus.send(Message::WidgetReady(3)).expect("send should succeed");
/// assert_eq!(rx.try_recv().unwrap(), Message::WidgetReady(3));
/// ```
#[derive(Debug, Clone)]
pub struct MessageBus {
    sender: broadcast::Sender<Message>,
}

impl MessageBus {
    /// Creates a new message bus with the specified capacity
    ///
    /// `capacity` is the number of messages buffered before older
    /// messages are dropped for slow receivers.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        MessageBus { sender }
    }

    /// Subscribe to receive messages sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Send a message to all subscribers
    ///
    /// Returns the number of receivers that received the message.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventError` if there are no active subscribers.
    pub fn send(&self, msg: Message) -> Result<usize, CoreError> {
        self.sender
            .send(msg)
            .map_err(|e| CoreError::EventError(format!("failed to send message: {}", e)))
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        MessageBus::new(256)
    }
}
