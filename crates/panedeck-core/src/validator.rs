//! Structural validation of a [`DashboardConfig`].
//!
//! Validation never stops at the first problem: every rule runs and each
//! violation is reported with a human-readable message and the position
//! of the offending node, e.g. `layout[0].rows[1].cols[0].width`.

use crate::config::{ContainerMetric, DashboardConfig, StackSpec, WidgetKind, WidgetSpec};
use crate::error::{CoreError, CoreResult};
use crate::percent::{parse_optional, PercentError};
use std::collections::HashSet;
use std::fmt;

/// Width units available across one row.
pub const COLUMN_UNITS: i64 = 12;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// What is wrong.
    pub message: String,
    /// Where it is wrong.
    pub position: String,
}

impl Violation {
    /// Creates a violation.
    pub fn new(message: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: position.into(),
        }
    }
}

/// Every violation found in one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl From<Vec<Violation>> for ValidationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl ValidationReport {
    /// `true` when the configuration passed every rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations in the order they were found.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Converts a non-empty report into [`CoreError::Validation`].
    ///
    /// # Errors
    ///
    /// Returns the report itself as an error when it is not empty.
    pub fn into_result(self) -> CoreResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }

    fn push(&mut self, message: impl Into<String>, position: impl Into<String>) {
        self.violations.push(Violation::new(message, position));
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            writeln!(f, "No.{} : {} (position : {})", i + 1, v.message, v.position)?;
        }
        Ok(())
    }
}

/// Runs every structural rule against `config`.
#[must_use]
pub fn validate(config: &DashboardConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_root(config, &mut report);
    let declared = check_widgets(&config.widgets, &mut report);
    check_layout(config, &declared, &mut report);
    report
}

fn check_root(config: &DashboardConfig, report: &mut ValidationReport) {
    if let Some(theme) = config.theme.as_deref() {
        if !matches!(theme, "dark" | "light") {
            report.push("'theme' should be 'dark' or 'light'", "theme");
        }
    }
    for (i, env) in config.envs.iter().enumerate() {
        if env.name.trim().is_empty() {
            report.push("'envs[].name' should have value", format!("envs[{i}]"));
        }
    }
}

fn check_widgets<'a>(widgets: &'a [WidgetSpec], report: &mut ValidationReport) -> HashSet<&'a str> {
    let mut declared = HashSet::new();
    for (i, widget) in widgets.iter().enumerate() {
        let at = format!("widgets[{i}]");
        if widget.id.is_empty() {
            report.push("'widgets[].id' should have value", &at);
        } else if !declared.insert(widget.id.as_str()) {
            report.push(format!("'widgets[].id' should be unique, '{}' is declared twice", widget.id), &at);
        }
        if widget.title.is_empty() {
            report.push("'widgets[].title' should have value", &at);
        }
        if widget.widget_type.is_empty() {
            report.push("'widgets[].type' should have value", &at);
            continue;
        }
        match widget.kind() {
            Ok(kind) => check_widget_payload(widget, kind, &at, report),
            Err(_) => report.push(
                format!("'widgets[].type' should be a known widget type, not '{}'", widget.widget_type),
                &at,
            ),
        }
    }
    declared
}

fn check_widget_payload(widget: &WidgetSpec, kind: WidgetKind, at: &str, report: &mut ValidationReport) {
    match kind {
        WidgetKind::Note => {
            if widget.text_content().is_none() {
                report.push("'widgets[].type=note' should have content", format!("{at}.content"));
            }
        }
        WidgetKind::TextFile | WidgetKind::TailFile => {
            if widget.path.as_deref().map_or(true, |p| p.trim().is_empty()) {
                report.push(format!("'widgets[].type={kind}' should have path"), format!("{at}.path"));
            }
        }
        WidgetKind::Menu => {
            if widget.content.is_none() {
                report.push("'widgets[].type=menu' should have content", format!("{at}.content"));
                return;
            }
            let Ok(entries) = widget.menu_entries() else {
                report.push("'widgets[].type=menu' content should be an array of entries", format!("{at}.content"));
                return;
            };
            for (j, entry) in entries.iter().enumerate() {
                let entry_at = format!("{at}.content[{j}]");
                for (field, value) in [
                    ("category", &entry.category),
                    ("name", &entry.name),
                    ("description", &entry.description),
                    ("command", &entry.command),
                ] {
                    if value.is_empty() {
                        report.push(format!("'widgets[].type=menu' should have value of content[].{field}"), &entry_at);
                    }
                }
            }
        }
        WidgetKind::DockerStatus => {
            if widget.content.is_none() {
                report.push("'widgets[].type=docker_status' should have content", format!("{at}.content"));
                return;
            }
            let Ok(entries) = widget.container_entries() else {
                report.push(
                    "'widgets[].type=docker_status' content should be an array of containers",
                    format!("{at}.content"),
                );
                return;
            };
            for (j, entry) in entries.iter().enumerate() {
                let entry_at = format!("{at}.content[{j}]");
                if entry.name.is_empty() {
                    report.push(
                        "'widgets[].type=docker_status' should have value of content[].name",
                        &entry_at,
                    );
                }
                if entry.container.is_empty() {
                    report.push(
                        "'widgets[].type=docker_status' should have value of content[].container",
                        &entry_at,
                    );
                }
                if entry.metrics.is_empty() {
                    report.push(
                        "'widgets[].type=docker_status' should have value of content[].metrics",
                        &entry_at,
                    );
                } else if entry.metrics.parse::<ContainerMetric>().is_err() {
                    report.push(
                        format!(
                            "'widgets[].type=docker_status' content[].metrics should be 'cpu' or 'memory', not '{}'",
                            entry.metrics
                        ),
                        &entry_at,
                    );
                }
            }
        }
        WidgetKind::GithubIssue => match widget.issue_regex.as_deref() {
            None | Some("") => {
                report.push(
                    "'widgets[].type=github_issue' should have issue_regex",
                    format!("{at}.issue_regex"),
                );
            }
            Some(pattern) => {
                if let Err(err) = regex::Regex::new(pattern) {
                    report.push(
                        format!("'widgets[].issue_regex' should be a valid regular expression: {err}"),
                        format!("{at}.issue_regex"),
                    );
                }
            }
        },
        WidgetKind::GitStatus => {}
    }
}

fn check_layout(config: &DashboardConfig, declared: &HashSet<&str>, report: &mut ValidationReport) {
    if config.layout.is_empty() {
        report.push("'layout' should have array of tab", "root");
        return;
    }
    for (t, tab) in config.layout.iter().enumerate() {
        let tab_at = format!("layout[{t}]");
        if tab.name.is_empty() {
            report.push("'layout[].name' should have value", &tab_at);
        }
        if tab.rows.is_empty() {
            report.push("'layout[].rows' should have array of row", &tab_at);
        }
        let mut row_total: u32 = 0;
        for (r, row) in tab.rows.iter().enumerate() {
            let row_at = format!("{tab_at}.rows[{r}]");
            row_total += percent_or_report(
                row.height.as_deref(),
                "layout[].rows[].height",
                &format!("{row_at}.height"),
                report,
            );
            if row.cols.is_empty() {
                report.push("'layout[].rows[].cols' should have array of col", &row_at);
            }
            let mut col_total: i64 = 0;
            for (c, col) in row.cols.iter().enumerate() {
                let col_at = format!("{row_at}.cols[{c}]");
                let width = col.width.unwrap_or(0);
                if !(0..=COLUMN_UNITS).contains(&width) {
                    report.push(
                        format!("'layout[].rows[].cols[].width' should be 0 ~ {COLUMN_UNITS}"),
                        format!("{col_at}.width"),
                    );
                } else {
                    col_total += width;
                }
                if col.stacks.is_empty() {
                    report.push("'layout[].rows[].cols[].stacks' should have array of stack", &col_at);
                }
                let mut stack_total: u32 = 0;
                for (s, stack) in col.stacks.iter().enumerate() {
                    let stack_at = format!("{col_at}.stacks[{s}]");
                    stack_total += check_stack(stack, declared, &stack_at, report);
                }
                if stack_total > 100 {
                    report.push(
                        format!(
                            "total of the layout[].rows[].cols[].stacks[].height in a col should be <= 100%, got {stack_total}%"
                        ),
                        &col_at,
                    );
                }
            }
            if col_total > COLUMN_UNITS {
                report.push(
                    format!(
                        "total of the layout[].rows[].cols[].width in a row should be <= {COLUMN_UNITS}, got {col_total}"
                    ),
                    &row_at,
                );
            }
        }
        if row_total > 100 {
            report.push(
                format!("total of the layout[].rows[].height in a tab should be <= 100%, got {row_total}%"),
                &tab_at,
            );
        }
    }
}

fn check_stack(
    stack: &StackSpec,
    declared: &HashSet<&str>,
    at: &str,
    report: &mut ValidationReport,
) -> u32 {
    if stack.id.is_empty() {
        report.push("'layout[].rows[].cols[].stacks[].id' should have value", at);
    } else if !declared.contains(stack.id.as_str()) {
        report.push(
            format!(
                "'layout[].rows[].cols[].stacks[].id' should be defined in widgets[].id, '{}' is not",
                stack.id
            ),
            format!("{at}.id"),
        );
    }
    percent_or_report(
        stack.height.as_deref(),
        "layout[].rows[].cols[].stacks[].height",
        &format!("{at}.height"),
        report,
    )
}

/// Reports a bad percentage under `field`, the dotted path shared by every
/// occurrence, at the indexed position `at`.
fn percent_or_report(raw: Option<&str>, field: &str, at: &str, report: &mut ValidationReport) -> u32 {
    match parse_optional(raw) {
        Ok(value) => u32::from(value.unwrap_or(0)),
        Err(PercentError::Malformed(_) | PercentError::OutOfRange(_)) => {
            report.push(format!("'{field}' should be '0%' ~ '100%'"), at);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnSpec, RowSpec, TabSpec};

    fn note(id: &str) -> WidgetSpec {
        WidgetSpec {
            id: id.into(),
            widget_type: "note".into(),
            title: id.to_uppercase(),
            content: Some(serde_json::Value::String("hello".into())),
            ..WidgetSpec::default()
        }
    }

    fn stack(id: &str, height: Option<&str>) -> StackSpec {
        StackSpec {
            id: id.into(),
            height: height.map(str::to_string),
        }
    }

    fn single_tab(cols: Vec<ColumnSpec>) -> Vec<TabSpec> {
        vec![TabSpec {
            name: "main".into(),
            rows: vec![RowSpec { height: None, cols }],
        }]
    }

    fn config(widgets: Vec<WidgetSpec>, layout: Vec<TabSpec>) -> DashboardConfig {
        DashboardConfig {
            schema_version: "1.0.0".into(),
            widgets,
            layout,
            ..DashboardConfig::default()
        }
    }

    fn positions(report: &ValidationReport) -> Vec<&str> {
        report.violations().iter().map(|v| v.position.as_str()).collect()
    }

    #[test]
    fn test_valid_config_passes() {
        let cfg = config(
            vec![note("a"), note("b")],
            single_tab(vec![
                ColumnSpec {
                    width: Some(6),
                    stacks: vec![stack("a", Some("50%")), stack("b", None)],
                },
                ColumnSpec {
                    width: None,
                    stacks: vec![stack("a", None)],
                },
            ]),
        );
        let report = validate(&cfg);
        assert!(report.is_empty(), "{report}");
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_empty_layout_is_rejected_at_root() {
        let report = validate(&config(vec![note("a")], Vec::new()));
        assert_eq!(positions(&report), vec!["root"]);
    }

    #[test]
    fn test_undeclared_stack_id() {
        let cfg = config(
            vec![note("a")],
            single_tab(vec![ColumnSpec {
                width: None,
                stacks: vec![stack("ghost", None)],
            }]),
        );
        let report = validate(&cfg);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.violations()[0].position,
            "layout[0].rows[0].cols[0].stacks[0].id"
        );
        assert!(report.violations()[0].message.contains("ghost"));
    }

    #[test]
    fn test_width_overflow_and_out_of_range() {
        let cfg = config(
            vec![note("a")],
            single_tab(vec![
                ColumnSpec {
                    width: Some(8),
                    stacks: vec![stack("a", None)],
                },
                ColumnSpec {
                    width: Some(6),
                    stacks: vec![stack("a", None)],
                },
                ColumnSpec {
                    width: Some(13),
                    stacks: vec![stack("a", None)],
                },
            ]),
        );
        let report = validate(&cfg);
        let pos = positions(&report);
        assert!(pos.contains(&"layout[0].rows[0].cols[2].width"));
        assert!(pos.contains(&"layout[0].rows[0]"));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_height_rules() {
        let cfg = config(
            vec![note("a")],
            single_tab(vec![ColumnSpec {
                width: None,
                stacks: vec![
                    stack("a", Some("70%")),
                    stack("a", Some("40%")),
                    stack("a", Some("tall")),
                    stack("a", Some("150%")),
                ],
            }]),
        );
        let report = validate(&cfg);
        let pos = positions(&report);
        assert!(pos.contains(&"layout[0].rows[0].cols[0].stacks[2].height"));
        assert!(pos.contains(&"layout[0].rows[0].cols[0].stacks[3].height"));
        assert!(pos.contains(&"layout[0].rows[0].cols[0]"));
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_row_heights_over_100() {
        let cfg = config(
            vec![note("a")],
            vec![TabSpec {
                name: "main".into(),
                rows: vec![
                    RowSpec {
                        height: Some("60%".into()),
                        cols: vec![ColumnSpec {
                            width: None,
                            stacks: vec![stack("a", None)],
                        }],
                    },
                    RowSpec {
                        height: Some("60%".into()),
                        cols: vec![ColumnSpec {
                            width: None,
                            stacks: vec![stack("a", None)],
                        }],
                    },
                ],
            }],
        );
        let report = validate(&cfg);
        assert_eq!(positions(&report), vec!["layout[0]"]);
    }

    #[test]
    fn test_messages_name_the_config_path() {
        let cfg = config(
            vec![note("a")],
            vec![TabSpec {
                name: "main".into(),
                rows: vec![RowSpec {
                    height: Some("120%".into()),
                    cols: vec![ColumnSpec {
                        width: Some(13),
                        stacks: vec![stack("a", Some("half"))],
                    }],
                }],
            }],
        );
        let report = validate(&cfg);
        let found: Vec<_> = report
            .violations()
            .iter()
            .map(|v| (v.message.as_str(), v.position.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("'layout[].rows[].height' should be '0%' ~ '100%'", "layout[0].rows[0].height"),
                ("'layout[].rows[].cols[].width' should be 0 ~ 12", "layout[0].rows[0].cols[0].width"),
                (
                    "'layout[].rows[].cols[].stacks[].height' should be '0%' ~ '100%'",
                    "layout[0].rows[0].cols[0].stacks[0].height"
                ),
            ]
        );
    }

    #[test]
    fn test_empty_containers() {
        let cfg = config(
            vec![note("a")],
            vec![
                TabSpec {
                    name: String::new(),
                    rows: Vec::new(),
                },
                TabSpec {
                    name: "second".into(),
                    rows: vec![RowSpec {
                        height: None,
                        cols: vec![ColumnSpec::default()],
                    }],
                },
            ],
        );
        let report = validate(&cfg);
        let pos = positions(&report);
        assert_eq!(
            pos,
            vec!["layout[0]", "layout[0]", "layout[1].rows[0].cols[0]"]
        );
    }

    #[test]
    fn test_widget_rules() {
        let mut dup = note("a");
        dup.title = String::new();
        let unknown = WidgetSpec {
            id: "w".into(),
            widget_type: "weather".into(),
            title: "Weather".into(),
            ..WidgetSpec::default()
        };
        let tail = WidgetSpec {
            id: "log".into(),
            widget_type: "tail_file".into(),
            title: "Log".into(),
            ..WidgetSpec::default()
        };
        let issue = WidgetSpec {
            id: "issue".into(),
            widget_type: "github_issue".into(),
            title: "Issue".into(),
            issue_regex: Some("(unclosed".into()),
            ..WidgetSpec::default()
        };
        let cfg = config(
            vec![note("a"), dup, unknown, tail, issue],
            single_tab(vec![ColumnSpec {
                width: None,
                stacks: vec![stack("a", None)],
            }]),
        );
        let report = validate(&cfg);
        let pos = positions(&report);
        assert_eq!(
            pos,
            vec![
                "widgets[1]",
                "widgets[1]",
                "widgets[2]",
                "widgets[3].path",
                "widgets[4].issue_regex",
            ]
        );
    }

    #[test]
    fn test_menu_and_docker_content() {
        let menu = WidgetSpec {
            id: "m".into(),
            widget_type: "menu".into(),
            title: "Menu".into(),
            content: Some(serde_json::json!([
                { "category": "c", "name": "n", "description": "d" }
            ])),
            ..WidgetSpec::default()
        };
        let docker = WidgetSpec {
            id: "d".into(),
            widget_type: "docker_status".into(),
            title: "Docker".into(),
            content: Some(serde_json::json!([
                { "name": "db", "container": "pg", "metrics": "disk" },
                { "name": "web", "container": "nginx" }
            ])),
            ..WidgetSpec::default()
        };
        let cfg = config(
            vec![menu, docker],
            single_tab(vec![ColumnSpec {
                width: None,
                stacks: vec![stack("m", None), stack("d", None)],
            }]),
        );
        let report = validate(&cfg);
        let messages: Vec<_> = report.violations().iter().map(|v| v.message.as_str()).collect();
        assert_eq!(report.len(), 3);
        assert_eq!(
            messages[0],
            "'widgets[].type=menu' should have value of content[].command"
        );
        assert!(messages[1].contains("'disk'"));
        assert_eq!(
            messages[2],
            "'widgets[].type=docker_status' should have value of content[].metrics"
        );
        assert_eq!(report.violations()[2].position, "widgets[1].content[1]");
    }

    #[test]
    fn test_theme_must_be_known() {
        let mut cfg = config(
            vec![note("a")],
            single_tab(vec![ColumnSpec {
                width: None,
                stacks: vec![stack("a", None)],
            }]),
        );
        cfg.theme = Some("solarized".into());
        let report = validate(&cfg);
        assert_eq!(positions(&report), vec!["theme"]);
    }

    #[test]
    fn test_report_display_is_numbered() {
        let report = ValidationReport::from(vec![
            Violation::new("one", "root"),
            Violation::new("two", "widgets[0]"),
        ]);
        assert_eq!(
            report.to_string(),
            "No.1 : one (position : root)\nNo.2 : two (position : widgets[0])\n"
        );
    }
}
