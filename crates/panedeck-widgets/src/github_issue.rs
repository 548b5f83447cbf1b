//! `github_issue` widget
//!
//! Shows the GitHub issue the current branch refers to. The issue number
//! is taken from the branch name with the configured `issue_regex`; the
//! repository is the one behind the `origin` remote.

use crate::error::{GitResult, GithubError};
use crate::repo::{GitRepo, RemoteRepo};
use crate::text::{render_lines, Highlight, Scroll};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use chrono_tz::Tz;
use crossterm::event::KeyEvent;
use panedeck_core::{
    InitContext, InitFuture, InitOutcome, Message, Widget, WidgetError, WidgetKind, WidgetView,
};
use parking_lot::Mutex;
use ratatui::prelude::*;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment variable holding the API token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub title: String,
}

/// The fields of an issue the widget shows
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    pub user: User,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub user: User,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Issue number referenced by `branch`.
///
/// The first capture group is used when the pattern has one, otherwise
/// the whole match. A leading `#` is ignored.
///
/// ```
/// use panedeck_widgets::github_issue::issue_number;
/// use regex::Regex;
///
/// let pattern = Regex::new(r"^feature/(\d+)").unwrap();
/// assert_eq!(issue_number(&pattern, "feature/42-login"), Some(42));
/// assert_eq!(issue_number(&pattern, "main"), None);
/// ```
#[must_use]
pub fn issue_number(pattern: &Regex, branch: &str) -> Option<u64> {
    let captures = pattern.captures(branch)?;
    let found = captures.get(1).or_else(|| captures.get(0))?;
    found.as_str().trim_start_matches('#').parse().ok()
}

/// REST API root for a GitHub or GitHub Enterprise host.
#[must_use]
pub fn api_base(host: &str) -> String {
    match host.trim().trim_end_matches('/') {
        "" | "github.com" => "https://api.github.com".to_string(),
        other => format!("https://{other}/api/v3"),
    }
}

/// Minimal GitHub REST client
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl GithubClient {
    pub fn new(host: &str, token: &str) -> Result<Self, GithubError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("panedeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GithubClient {
            client,
            base: api_base(host),
            token: token.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, GithubError> {
        debug!(%url, "requesting");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GithubError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }

    /// Fetches an issue and all of its comments.
    pub async fn issue(
        &self,
        repo: &RemoteRepo,
        number: u64,
    ) -> Result<(Issue, Vec<Comment>), GithubError> {
        let url = format!("{}/repos/{}/{}/issues/{number}", self.base, repo.owner, repo.name);
        let issue = self.get_json(url.clone()).await?;
        let comments = self.get_json(format!("{url}/comments")).await?;
        Ok((issue, comments))
    }
}

const INDENT: &str = "         ";

fn push_indented(lines: &mut Vec<String>, text: &str) {
    lines.extend(text.lines().map(|line| format!("{INDENT}{line}")));
}

/// Renders an issue and its comments as text lines.
#[must_use]
pub fn format_issue(issue: &Issue, comments: &[Comment], zone: DisplayZone) -> Vec<String> {
    let mut lines = vec![
        format!("TITLE  : {}", issue.title),
        format!("NO     : #{}", issue.number),
        format!("BY     : {}", issue.user.login),
        format!("URL    : {}", issue.html_url),
    ];
    if !issue.labels.is_empty() {
        let labels: Vec<String> = issue.labels.iter().map(|l| format!("[{}]", l.name)).collect();
        lines.push(format!("LABEL  : {}", labels.join(" ")));
    }
    if let Some(milestone) = &issue.milestone {
        lines.push(format!("MILE   : {}", milestone.title));
    }
    lines.push("-".repeat(40));
    lines.push("DESC   :".to_string());
    push_indented(&mut lines, issue.body.as_deref().unwrap_or_default());

    for comment in comments {
        lines.push("-".repeat(40));
        lines.push(format!(
            "@{} commented on {}",
            comment.user.login,
            zone.format(comment.created_at, "%Y-%m-%d %H:%M %:z")
        ));
        push_indented(&mut lines, comment.body.as_deref().unwrap_or_default());
    }
    lines
}

/// Zone comment timestamps are shown in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    /// An IANA zone such as `Asia/Tokyo`.
    Named(Tz),
    /// A fixed offset such as `+09:00`.
    Fixed(FixedOffset),
}

impl Default for DisplayZone {
    fn default() -> Self {
        DisplayZone::Fixed(Utc.fix())
    }
}

impl DisplayZone {
    /// Resolves the configured `timezone`.
    ///
    /// IANA names are tried first, then fixed offsets. Anything else, or
    /// no setting at all, means UTC.
    ///
    /// ```
    /// use panedeck_widgets::github_issue::DisplayZone;
    ///
    /// assert_eq!(DisplayZone::parse(Some("Asia/Tokyo")), DisplayZone::Named(chrono_tz::Asia::Tokyo));
    /// assert_eq!(DisplayZone::parse(None), DisplayZone::default());
    /// ```
    #[must_use]
    pub fn parse(timezone: Option<&str>) -> Self {
        let Some(tz) = timezone.map(str::trim).filter(|tz| !tz.is_empty()) else {
            return DisplayZone::default();
        };
        if let Ok(named) = tz.parse::<Tz>() {
            return DisplayZone::Named(named);
        }
        match DateTime::parse_from_rfc3339(&format!("1970-01-01T00:00:00{tz}")) {
            Ok(stamp) => DisplayZone::Fixed(*stamp.offset()),
            Err(_) => {
                warn!(timezone = tz, "unknown timezone, using UTC");
                DisplayZone::default()
            }
        }
    }

    /// Formats `when` in this zone.
    #[must_use]
    pub fn format(self, when: DateTime<Utc>, pattern: &str) -> String {
        match self {
            DisplayZone::Named(tz) => when.with_timezone(&tz).format(pattern).to_string(),
            DisplayZone::Fixed(offset) => when.with_timezone(&offset).format(pattern).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Settings {
    dir: PathBuf,
    host: String,
    token: String,
    pattern: Regex,
    zone: DisplayZone,
}

async fn load(settings: Settings, lines: Arc<Mutex<Vec<String>>>) -> Result<(), WidgetError> {
    let dir = settings.dir.clone();
    let (branch, remote) = tokio::task::spawn_blocking(move || -> GitResult<(String, RemoteRepo)> {
        let repo = GitRepo::open(&dir)?;
        Ok((repo.current_branch()?, repo.origin()?))
    })
    .await
    .map_err(|err| WidgetError::Unavailable(format!("git task ({err})")))??;

    let Some(number) = issue_number(&settings.pattern, &branch) else {
        *lines.lock() = vec![format!("branch '{branch}' does not reference an issue")];
        return Ok(());
    };

    let client = GithubClient::new(&settings.host, &settings.token)?;
    let (issue, comments) = client.issue(&remote, number).await?;
    info!(number, comments = comments.len(), "loaded issue");
    *lines.lock() = format_issue(&issue, &comments, settings.zone);
    Ok(())
}

/// Issue viewer
pub struct GithubIssueWidget {
    dir: PathBuf,
    host: String,
    pattern: String,
    token: Option<String>,
    zone: DisplayZone,
    lines: Arc<Mutex<Vec<String>>>,
    scroll: Scroll,
}

impl GithubIssueWidget {
    /// `dir` locates the repository; `token` is usually read from
    /// [`TOKEN_VAR`].
    pub fn new(
        dir: PathBuf,
        pattern: &str,
        host: &str,
        timezone: Option<&str>,
        token: Option<String>,
    ) -> Self {
        GithubIssueWidget {
            dir,
            host: host.to_string(),
            pattern: pattern.to_string(),
            token,
            zone: DisplayZone::parse(timezone),
            lines: Arc::new(Mutex::new(Vec::new())),
            scroll: Scroll::default(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Widget for GithubIssueWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::GithubIssue
    }

    fn init(&mut self, _ctx: InitContext) -> InitOutcome {
        let Some(token) = self.token.clone().filter(|t| !t.is_empty()) else {
            return InitOutcome::Failed(WidgetError::Unavailable(TOKEN_VAR.to_string()));
        };
        let pattern = match Regex::new(&self.pattern) {
            Ok(pattern) => pattern,
            Err(err) => return InitOutcome::Failed(WidgetError::Invalid(err.to_string())),
        };
        let settings = Settings {
            dir: self.dir.clone(),
            host: self.host.clone(),
            token,
            pattern,
            zone: self.zone,
        };
        let task: InitFuture = Box::pin(load(settings, Arc::clone(&self.lines)));
        InitOutcome::Deferred(task)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        let total = self.lines.lock().len();
        self.scroll.handle_key(key, total);
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let lines = self.lines.lock();
        render_lines(frame, area, lines.as_slice(), self.scroll, Highlight::Markdown, view.theme);
    }
}
