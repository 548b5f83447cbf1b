//! Error types for the panedeck-widgets crate

use panedeck_core::WidgetError;
use thiserror::Error;

/// Git-specific errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Not inside a Git repository
    #[error("not a git repository")]
    NotARepository,

    /// The repository has no `origin` remote pointing at GitHub
    #[error("no usable origin remote")]
    NoOrigin,

    /// Git operation failed
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

/// Result type alias for Git operations
pub type GitResult<T> = Result<T, GitError>;

/// Errors talking to the GitHub REST API
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("GitHub answered {status} for {url}")]
    Status { status: u16, url: String },
}

impl From<GitError> for WidgetError {
    fn from(err: GitError) -> Self {
        WidgetError::Unavailable(format!("git repository ({err})"))
    }
}

impl From<GithubError> for WidgetError {
    fn from(err: GithubError) -> Self {
        WidgetError::Unavailable(format!("GitHub ({err})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_becomes_unavailable() {
        let err: WidgetError = GitError::NotARepository.into();
        assert_eq!(
            err.to_string(),
            "git repository (not a git repository) is unavailable"
        );
    }

    #[test]
    fn test_github_status_display() {
        let err = GithubError::Status {
            status: 404,
            url: "https://api.github.com/repos/o/r/issues/1".into(),
        };
        assert!(err.to_string().starts_with("GitHub answered 404"));
    }
}
