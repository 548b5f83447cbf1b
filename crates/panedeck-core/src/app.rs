//! Application coordinator trait
//!
//! The `AppCoordinator` trait is the interface the terminal loop drives:
//! it feeds messages in, ticks the application and asks whether to stop.

use crate::event::Message;
use crate::theme::Theme;

/// Trait for the main application coordinator
///
/// # Example
///
/// ```ignore
/// use panedeck_core::{AppCoordinator, Message, Theme};
///
/// struct MyApp {
///     tabs: Vec<String>,
///     active: Option<usize>,
///     theme: Theme,
///     quit: bool,
/// }
///
/// impl AppCoordinator for MyApp {
///     fn tab_names(&self) -> Vec<&str> { self.tabs.iter().map(String::as_str).collect() }
///     fn active_tab(&self) -> Option<usize> { self.active }
///     fn theme(&self) -> &Theme { &self.theme }
///     fn dispatch(&mut self, msg: Message) {
///         if msg == Message::Quit {
///             self.quit = true;
///         }
///     }
///     fn tick(&mut self) {}
///     fn should_quit(&self) -> bool { self.quit }
/// }
/// ```
pub trait AppCoordinator {
    /// Names of all tabs in display order
    fn tab_names(&self) -> Vec<&str>;

    /// Position of the visible tab, `None` before the first switch
    fn active_tab(&self) -> Option<usize>;

    /// Returns the current theme
    fn theme(&self) -> &Theme;

    /// Dispatch a message to be processed
    fn dispatch(&mut self, msg: Message);

    /// Called on each tick of the main loop
    ///
    /// This is where messages published by widget tasks are picked up.
    fn tick(&mut self);

    /// Returns true if the application should quit
    fn should_quit(&self) -> bool;
}
