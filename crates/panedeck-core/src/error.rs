//! Core error types for panedeck-core
//!
//! Configuration problems are the only fatal errors in the dashboard. Once
//! a layout has been validated and resolved, steady-state conditions (a
//! missing neighbor, a disabled widget) are modelled as state, not errors.

use crate::validator::ValidationReport;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or assembling a dashboard.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The configuration file could not be read.
    #[error("failed to read config at {path:?}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    /// The configuration file is not valid TOML for the dashboard schema.
    #[error("failed to parse config at {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A schema version string could not be parsed.
    #[error("invalid schema_version: {0}")]
    SchemaVersion(#[from] semver::Error),

    /// The configuration targets an older schema than this build supports.
    #[error("schema_version {found} is older than the supported schema_version {supported}")]
    SchemaMismatch { supported: String, found: String },

    /// One or more structural rules were violated.
    ///
    /// The report carries every violation, not just the first one.
    #[error("configuration error\n{0}")]
    Validation(ValidationReport),

    /// A stack slot references a widget id that was never declared.
    #[error("no widget named {0}")]
    UnknownWidget(String),

    /// A widget declares a type this build does not implement.
    #[error("widget type \"{0}\" is not supported")]
    UnsupportedWidgetType(String),

    /// Event system error, such as a closed channel.
    #[error("event error: {0}")]
    EventError(String),

    /// Underlying IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
