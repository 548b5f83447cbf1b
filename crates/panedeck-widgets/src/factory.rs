//! Widget construction
//!
//! The type tag of a declaration selects the implementation once, when
//! the dashboard is built.

use crate::docker_status::DockerStatusWidget;
use crate::git_status::GitStatusWidget;
use crate::github_issue::{GithubIssueWidget, TOKEN_VAR};
use crate::menu::MenuWidget;
use crate::note::NoteWidget;
use crate::tail_file::TailFileWidget;
use panedeck_core::{CoreResult, DashboardConfig, Widget, WidgetKind, WidgetSpec};
use std::path::PathBuf;

/// Dashboard-wide settings widgets are built with
#[derive(Debug, Clone, Default)]
pub struct WidgetEnv {
    /// Directory relative paths resolve against; also where git widgets
    /// look for a repository.
    pub base_dir: PathBuf,
    /// Extra environment for commands launched from menus
    pub envs: Vec<(String, String)>,
    pub github_host: String,
    pub timezone: Option<String>,
    pub github_token: Option<String>,
}

impl WidgetEnv {
    /// Settings from `config`, with the GitHub token taken from the
    /// process environment.
    pub fn from_config(config: &DashboardConfig) -> Self {
        WidgetEnv {
            base_dir: config.base_dir().to_path_buf(),
            envs: config
                .envs
                .iter()
                .map(|e| (e.name.clone(), e.value.clone()))
                .collect(),
            github_host: config
                .github_host
                .clone()
                .unwrap_or_else(|| "github.com".to_string()),
            timezone: config.timezone.clone(),
            github_token: std::env::var(TOKEN_VAR).ok(),
        }
    }

    fn resolve(&self, raw: Option<&str>) -> PathBuf {
        let raw = PathBuf::from(raw.unwrap_or_default());
        if raw.is_absolute() || self.base_dir.as_os_str().is_empty() {
            raw
        } else {
            self.base_dir.join(raw)
        }
    }

    fn repo_dir(&self) -> PathBuf {
        if self.base_dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            self.base_dir.clone()
        }
    }
}

/// Builds the widget declared by `spec`.
///
/// Malformed per-type settings do not fail here; the widget reports them
/// when initialized and ends up disabled.
///
/// # Errors
///
/// [`panedeck_core::CoreError::UnsupportedWidgetType`] for unknown type tags.
pub fn build_widget(spec: &WidgetSpec, env: &WidgetEnv) -> CoreResult<Box<dyn Widget>> {
    let widget: Box<dyn Widget> = match spec.kind()? {
        WidgetKind::Note => Box::new(NoteWidget::inline(spec.text_content().unwrap_or_default())),
        WidgetKind::TextFile => Box::new(NoteWidget::file(env.resolve(spec.path.as_deref()))),
        WidgetKind::TailFile => Box::new(TailFileWidget::new(env.resolve(spec.path.as_deref()))),
        WidgetKind::Menu => Box::new(MenuWidget::from_content(spec.menu_entries(), env.envs.clone())),
        WidgetKind::GitStatus => Box::new(GitStatusWidget::new(env.repo_dir())),
        WidgetKind::DockerStatus => Box::new(DockerStatusWidget::new(
            spec.container_entries().unwrap_or_default(),
        )),
        WidgetKind::GithubIssue => Box::new(GithubIssueWidget::new(
            env.repo_dir(),
            spec.issue_regex.as_deref().unwrap_or_default(),
            &env.github_host,
            env.timezone.as_deref(),
            env.github_token.clone(),
        )),
    };
    tracing::debug!(id = %spec.id, kind = %spec.widget_type, "built widget");
    Ok(widget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panedeck_core::CoreError;

    fn spec(kind: &str) -> WidgetSpec {
        WidgetSpec {
            id: "w".into(),
            widget_type: kind.into(),
            title: "W".into(),
            ..WidgetSpec::default()
        }
    }

    #[test]
    fn test_every_kind_builds() {
        let env = WidgetEnv::default();
        for kind in WidgetKind::ALL {
            let widget = build_widget(&spec(kind.as_str()), &env).unwrap();
            assert_eq!(widget.kind(), kind);
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = build_widget(&spec("clock"), &WidgetEnv::default()).err().unwrap();
        assert!(matches!(err, CoreError::UnsupportedWidgetType(t) if t == "clock"));
    }

    #[test]
    fn test_paths_resolve_against_base_dir() {
        let env = WidgetEnv {
            base_dir: PathBuf::from("/etc/dash"),
            ..WidgetEnv::default()
        };
        assert_eq!(env.resolve(Some("logs/app.log")), PathBuf::from("/etc/dash/logs/app.log"));
        assert_eq!(env.resolve(Some("/var/log/x")), PathBuf::from("/var/log/x"));
        assert_eq!(WidgetEnv::default().repo_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_env_from_config() {
        let config = DashboardConfig::from_toml_str(
            r#"
github_host = "git.example.com"
[[envs]]
name = "STAGE"
value = "prod"
"#,
        )
        .unwrap()
        .with_base_dir("/srv");
        let env = WidgetEnv::from_config(&config);
        assert_eq!(env.github_host, "git.example.com");
        assert_eq!(env.envs, vec![("STAGE".to_string(), "prod".to_string())]);
        assert_eq!(env.base_dir, PathBuf::from("/srv"));
    }
}
