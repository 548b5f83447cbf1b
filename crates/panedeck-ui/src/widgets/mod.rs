//! Dashboard chrome drawn around the widget grid
//!
//! - [`TabBar`] - one line listing the tabs as `N.name`
//! - [`StatusBar`] - one line with the focused widget, its state and key hints

pub mod status_bar;
pub mod tab_bar;

pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
