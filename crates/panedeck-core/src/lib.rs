//! # panedeck-core
//!
//! Layout and navigation engine of the panedeck terminal dashboard.
//!
//! ## Overview
//!
//! A dashboard is configured as a flat list of widgets plus a tree of
//! tabs, rows, columns and stacks. This crate turns that description into
//! something a terminal front end can draw and navigate:
//!
//! 1. [`DashboardConfig`] loads the TOML file and checks its schema version.
//! 2. [`validator::validate`] reports every structural problem at once.
//! 3. [`GridResolver`] sizes every stack slot for a given terminal size.
//! 4. [`navigator::link_neighbors`] links each slot to its nearest
//!    neighbor in every direction.
//!
//! Widgets themselves live behind the [`Widget`] trait; this crate only
//! knows their lifecycle, never their content.
//!
//! ## Example
//!
//! ```
//! use panedeck_core::{DashboardConfig, Direction, GridResolver};
//!
//! let config = DashboardConfig::from_toml_str(r#"
//! schema_version = "1.0.0"
//!
//! [[widgets]]
//! id = "left"
//! type = "note"
//! title = "Left"
//! content = "hello"
//!
//! [[widgets]]
//! id = "right"
//! type = "note"
//! title = "Right"
//! content = "world"
//!
//! [[layout]]
//! name = "main"
//! [[layout.rows]]
//! [[layout.rows.cols]]
//! width = 4
//! [[layout.rows.cols.stacks]]
//! id = "left"
//! [[layout.rows.cols]]
//! [[layout.rows.cols.stacks]]
//! id = "right"
//! "#).unwrap();
//!
//! assert!(config.validate().is_empty());
//!
//! let layout = GridResolver::new(120, 40).resolve(&config.layout);
//! assert_eq!(layout.rects[0].width, 40);
//! assert_eq!(layout.rects[1].width, 80);
//! assert_eq!(layout.rects[0].neighbor(Direction::Right), Some(1));
//! assert_eq!(layout.rects[1].neighbor(Direction::Right), None);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod navigator;
pub mod percent;
pub mod theme;
pub mod validator;
pub mod widget;

pub use app::AppCoordinator;
pub use config::{DashboardConfig, EnvVar, TabSpec, WidgetKind, WidgetSpec};
pub use error::{CoreError, CoreResult};
pub use event::{InputEvent, LaunchRequest, Message, MessageBus};
pub use geometry::{Direction, Edges, Neighbors, Point, ResolvedRect, SlotIndex};
pub use grid::{GridResolver, ResolvedLayout, TabGeometry};
pub use theme::{BorderStyle, Theme, ThemeColors};
pub use validator::{ValidationReport, Violation};
pub use widget::{
    InitContext, InitFuture, InitOutcome, LifecycleState, Widget, WidgetError, WidgetStatus,
    WidgetView,
};
