//! # panedeck-widgets
//!
//! The widget kinds a dashboard can declare, each implementing
//! [`panedeck_core::Widget`]:
//!
//! | type | widget |
//! |---|---|
//! | `note` | [`NoteWidget::inline`] |
//! | `text_file` | [`NoteWidget::file`] |
//! | `tail_file` | [`TailFileWidget`] |
//! | `menu` | [`MenuWidget`] |
//! | `git_status` | [`GitStatusWidget`] |
//! | `docker_status` | [`DockerStatusWidget`] |
//! | `github_issue` | [`GithubIssueWidget`] |
//!
//! [`build_widget`] picks the implementation for a declaration.
//!
//! ```ignore
//! use panedeck_widgets::{build_widget, WidgetEnv};
//!
//! let env = WidgetEnv::from_config(&config);
//! let manager = WidgetManager::build(&config, w, h, bus, |spec| build_widget(spec, &env))?;
//! ```

pub mod docker_status;
pub mod error;
pub mod factory;
pub mod git_status;
pub mod github_issue;
pub mod menu;
pub mod note;
pub mod repo;
pub mod tail_file;
pub mod text;

pub use docker_status::DockerStatusWidget;
pub use error::{GitError, GitResult, GithubError};
pub use factory::{build_widget, WidgetEnv};
pub use git_status::GitStatusWidget;
pub use github_issue::GithubIssueWidget;
pub use menu::MenuWidget;
pub use note::NoteWidget;
pub use repo::GitRepo;
pub use tail_file::TailFileWidget;
