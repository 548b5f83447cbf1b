//! Dashboard configuration model and loader.
//!
//! A dashboard is described by a single TOML document with two halves: a
//! flat list of widget declarations and a tree of tabs, rows, columns and
//! stacks that places those widgets on screen.
//!
//! ```toml
//! schema_version = "1.0.0"
//!
//! [[widgets]]
//! id = "readme"
//! type = "text_file"
//! title = "README"
//! path = "README.md"
//!
//! [[layout]]
//! name = "main"
//! [[layout.rows]]
//! [[layout.rows.cols]]
//! [[layout.rows.cols.stacks]]
//! id = "readme"
//! ```

use crate::error::{CoreError, CoreResult};
use crate::validator::{self, ValidationReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "panedeck.toml";

/// Root of a dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Schema version the file was written against.
    #[serde(default)]
    pub schema_version: String,
    /// IANA time zone name used by widgets that display timestamps.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Alternative GitHub host, for GitHub Enterprise installations.
    #[serde(default)]
    pub github_host: Option<String>,
    /// Colour theme name (`dark` or `light`).
    #[serde(default)]
    pub theme: Option<String>,
    /// Extra environment variables passed to commands launched from menus.
    #[serde(default)]
    pub envs: Vec<EnvVar>,
    /// Widget declarations.
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
    /// Tabs, in display order.
    #[serde(default)]
    pub layout: Vec<TabSpec>,
    #[serde(skip)]
    pub(crate) base_dir: PathBuf,
}

/// A `name = value` pair exported to launched commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One widget declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Identifier referenced from layout stacks.
    #[serde(default)]
    pub id: String,
    /// Widget type name, see [`WidgetKind`].
    #[serde(default, rename = "type")]
    pub widget_type: String,
    /// Title drawn on the widget frame.
    #[serde(default)]
    pub title: String,
    /// Type-specific payload: note text, menu entries, container list.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    /// File path for file-backed widgets, relative to the config file.
    #[serde(default)]
    pub path: Option<String>,
    /// Pattern selecting the issue number from the current branch name.
    #[serde(default)]
    pub issue_regex: Option<String>,
}

/// One tab of the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rows: Vec<RowSpec>,
}

/// A horizontal band of a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSpec {
    /// Percentage of the tab height, e.g. `"30%"`. Blank means automatic.
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub cols: Vec<ColumnSpec>,
}

/// A vertical band of a row, sized in twelfths of the row width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Width in units of 1/12. Zero or missing means automatic.
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub stacks: Vec<StackSpec>,
}

/// A single widget slot inside a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSpec {
    /// Id of the widget shown in this slot.
    #[serde(default)]
    pub id: String,
    /// Percentage of the column height. Blank means automatic.
    #[serde(default)]
    pub height: Option<String>,
}

/// The widget types this build knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Note,
    TextFile,
    TailFile,
    Menu,
    GitStatus,
    DockerStatus,
    GithubIssue,
}

impl WidgetKind {
    /// Every supported kind, in documentation order.
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::Note,
        WidgetKind::TextFile,
        WidgetKind::TailFile,
        WidgetKind::Menu,
        WidgetKind::GitStatus,
        WidgetKind::DockerStatus,
        WidgetKind::GithubIssue,
    ];

    /// The name used for this kind in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WidgetKind::Note => "note",
            WidgetKind::TextFile => "text_file",
            WidgetKind::TailFile => "tail_file",
            WidgetKind::Menu => "menu",
            WidgetKind::GitStatus => "git_status",
            WidgetKind::DockerStatus => "docker_status",
            WidgetKind::GithubIssue => "github_issue",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnsupportedWidgetType(s.to_string()))
    }
}

/// One launchable entry of a `menu` widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: String,
}

/// Metric shown for a container in a `docker_status` widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMetric {
    Cpu,
    Memory,
}

impl FromStr for ContainerMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(ContainerMetric::Cpu),
            "memory" => Ok(ContainerMetric::Memory),
            other => Err(other.to_string()),
        }
    }
}

/// One container row of a `docker_status` widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    /// Label shown in the widget.
    #[serde(default)]
    pub name: String,
    /// Container name or id as known to the docker CLI.
    #[serde(default)]
    pub container: String,
    /// `cpu` or `memory`.
    #[serde(default)]
    pub metrics: String,
}

impl WidgetSpec {
    /// Parses [`WidgetSpec::widget_type`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedWidgetType`] for unknown names.
    pub fn kind(&self) -> CoreResult<WidgetKind> {
        self.widget_type.parse()
    }

    /// The content as plain text, when it is a string.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_ref().and_then(serde_json::Value::as_str)
    }

    /// Decodes the content as a list of menu entries.
    ///
    /// # Errors
    ///
    /// Fails when the content is absent or not a list of tables.
    pub fn menu_entries(&self) -> Result<Vec<MenuEntry>, serde_json::Error> {
        decode_list(self.content.as_ref())
    }

    /// Decodes the content as a list of containers.
    ///
    /// # Errors
    ///
    /// Fails when the content is absent or not a list of tables.
    pub fn container_entries(&self) -> Result<Vec<ContainerEntry>, serde_json::Error> {
        decode_list(self.content.as_ref())
    }
}

fn decode_list<T: for<'de> Deserialize<'de>>(
    content: Option<&serde_json::Value>,
) -> Result<Vec<T>, serde_json::Error> {
    let value = content.cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value)
}

impl DashboardConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Relative paths resolve against the current directory until
    /// [`DashboardConfig::with_base_dir`] says otherwise.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the document does not match the schema.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Reads and parses the configuration at `path`.
    ///
    /// The parent directory of `path` becomes the base for relative widget
    /// paths.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigRead`] or [`CoreError::ConfigParse`].
    pub fn load(path: &Path) -> CoreResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tracing::debug!(path = %path.display(), widgets = config.widgets.len(), "loaded config");
        Ok(config.with_base_dir(base))
    }

    /// Loads, checks the schema version and validates in one step.
    ///
    /// # Errors
    ///
    /// Any error from [`load`](Self::load) or
    /// [`check_schema`](Self::check_schema), or [`CoreError::Validation`]
    /// carrying the full violation report.
    pub fn load_validated(path: &Path, supported_schema: &str) -> CoreResult<Self> {
        let config = Self::load(path)?;
        config.check_schema(supported_schema)?;
        config.validate().into_result()?;
        Ok(config)
    }

    /// Sets the directory relative paths are resolved against.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves a widget path against [`base_dir`](Self::base_dir).
    #[must_use]
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() || self.base_dir.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Looks up a widget declaration by id.
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&WidgetSpec> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Rejects configurations written for an older schema.
    ///
    /// Versions may omit trailing components, so `"1"` and `"1.0"` both
    /// mean `1.0.0`. Newer configurations are accepted.
    ///
    /// # Errors
    ///
    /// [`CoreError::SchemaVersion`] when either version is unparseable,
    /// [`CoreError::SchemaMismatch`] when the file is too old.
    pub fn check_schema(&self, supported: &str) -> CoreResult<()> {
        let wanted = parse_version(supported)?;
        let found = parse_version(&self.schema_version)?;
        if found < wanted {
            return Err(CoreError::SchemaMismatch {
                supported: wanted.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Runs every structural rule and returns the full report.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validator::validate(self)
    }
}

/// Parses a possibly abbreviated version such as `"1.2"`.
///
/// # Errors
///
/// Returns the semver error when the padded string is still invalid.
pub fn parse_version(raw: &str) -> Result<semver::Version, semver::Error> {
    let trimmed = raw.trim().trim_start_matches('v');
    let core_len = trimmed
        .find(['-', '+'])
        .unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(core_len);
    let padding = match core.matches('.').count() {
        0 if !core.is_empty() => ".0.0",
        1 => ".0",
        _ => "",
    };
    semver::Version::parse(&format!("{core}{padding}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
schema_version = "1.0"
theme = "light"

[[envs]]
name = "EDITOR"
value = "vim"

[[widgets]]
id = "memo"
type = "note"
title = "Memo"
content = "remember the milk"

[[widgets]]
id = "tools"
type = "menu"
title = "Tools"
content = [
  { category = "build", name = "test", description = "run tests", command = "make test" },
]

[[layout]]
name = "main"
[[layout.rows]]
height = "40%"
[[layout.rows.cols]]
width = 4
[[layout.rows.cols.stacks]]
id = "memo"
[[layout.rows.cols]]
[[layout.rows.cols.stacks]]
id = "tools"
"#;

    #[test]
    fn test_parse_sample() {
        let config = DashboardConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.theme.as_deref(), Some("light"));
        assert_eq!(config.envs[0].name, "EDITOR");
        assert_eq!(config.widgets.len(), 2);
        assert_eq!(config.layout[0].rows[0].height.as_deref(), Some("40%"));
        assert_eq!(config.layout[0].rows[0].cols[0].width, Some(4));
        assert_eq!(config.layout[0].rows[0].cols[1].width, None);
    }

    #[test]
    fn test_widget_content_accessors() {
        let config = DashboardConfig::from_toml_str(SAMPLE).unwrap();
        let memo = config.widget("memo").unwrap();
        assert_eq!(memo.kind().unwrap(), WidgetKind::Note);
        assert_eq!(memo.text_content(), Some("remember the milk"));

        let tools = config.widget("tools").unwrap();
        let entries = tools.menu_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "make test");
    }

    #[test]
    fn test_menu_entries_reject_plain_text() {
        let spec = WidgetSpec {
            content: Some(serde_json::Value::String("nope".into())),
            ..WidgetSpec::default()
        };
        assert!(spec.menu_entries().is_err());
        assert!(WidgetSpec::default().container_entries().is_err());
    }

    #[test]
    fn test_widget_kind_round_trip_names() {
        for kind in WidgetKind::ALL {
            assert_eq!(kind.as_str().parse::<WidgetKind>().unwrap(), kind);
        }
        assert!(matches!(
            "clock".parse::<WidgetKind>(),
            Err(CoreError::UnsupportedWidgetType(name)) if name == "clock"
        ));
    }

    #[test]
    fn test_container_metric() {
        assert_eq!("cpu".parse(), Ok(ContainerMetric::Cpu));
        assert_eq!("memory".parse(), Ok(ContainerMetric::Memory));
        assert!("disk".parse::<ContainerMetric>().is_err());
    }

    #[test]
    fn test_parse_version_padding() {
        assert_eq!(parse_version("1").unwrap(), semver::Version::new(1, 0, 0));
        assert_eq!(parse_version("1.2").unwrap(), semver::Version::new(1, 2, 0));
        assert_eq!(parse_version("v2.0.1").unwrap(), semver::Version::new(2, 0, 1));
        assert!(parse_version("").is_err());
        assert!(parse_version("one").is_err());
    }

    #[test]
    fn test_check_schema() {
        let config = DashboardConfig {
            schema_version: "1.0".into(),
            ..DashboardConfig::default()
        };
        assert!(config.check_schema("1.0.0").is_ok());
        assert!(config.check_schema("0.9.0").is_ok());
        assert!(matches!(
            config.check_schema("1.1.0"),
            Err(CoreError::SchemaMismatch { .. })
        ));

        let missing = DashboardConfig::default();
        assert!(matches!(
            missing.check_schema("1.0.0"),
            Err(CoreError::SchemaVersion(_))
        ));
    }

    #[test]
    fn test_load_sets_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.base_dir(), dir.path());
        assert_eq!(config.resolve_path("notes.md"), dir.path().join("notes.md"));
        assert_eq!(config.resolve_path("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "widgets = 3").unwrap();
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_validated_reports_violations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "schema_version = \"1.0.0\"\n").unwrap();
        let err = DashboardConfig::load_validated(&path, "1.0.0").unwrap_err();
        match err {
            CoreError::Validation(report) => assert!(!report.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_validated_accepts_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.toml");
        fs::write(&path, SAMPLE).unwrap();
        let config = DashboardConfig::load_validated(&path, "1.0.0").unwrap();
        assert_eq!(config.layout.len(), 1);
    }
}
