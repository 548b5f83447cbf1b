//! # panedeck-ui
//!
//! Widget lifecycle management and drawing for the panedeck dashboard.
//!
//! - [`WidgetManager`] - widget instances, tab switching and directional focus
//! - [`App`] - coordinator implementing [`panedeck_core::AppCoordinator`]
//! - [`AppLayout`] and [`render_dashboard`] - frame layout and grid drawing
//! - [`TabBar`] and [`StatusBar`] - the one-line bars around the grid
//! - [`keymap`] - global key bindings
//!
//! ## Example
//!
//! ```ignore
//! use panedeck_ui::{App, AppLayout, WidgetManager};
//!
//! let (w, h) = AppLayout::grid_size(cols, rows);
//! let manager = WidgetManager::build(&config, w, h, MessageBus::default(), factory)?;
//! let mut app = App::new(manager, theme);
//! app.start(runtime.handle());
//! ```

pub mod app;
pub mod keymap;
pub mod renderer;
pub mod widget_manager;
pub mod widgets;

pub use app::App;
pub use renderer::{render_dashboard, AppLayout};
pub use widget_manager::{Bounce, NavigationState, WidgetInstance, WidgetManager};
pub use widgets::{StatusBar, TabBar};
