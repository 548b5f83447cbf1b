//! Read-only access to the repository a dashboard lives in
//!
//! A thin wrapper around git2. Repository handles are not `Sync`, so
//! widgets open a fresh [`GitRepo`] inside `spawn_blocking` for every
//! refresh.

use crate::error::{GitError, GitResult};
use git2::{ErrorCode, Repository, Status, StatusOptions};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// File status in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
    Conflicted,
}

impl FileStatus {
    /// Word shown in the STATUS column
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Added => "new file",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Renamed => "renamed",
            FileStatus::Untracked => "untracked",
            FileStatus::Conflicted => "conflicted",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file entry with its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path relative to repository root
    pub path: PathBuf,
    pub status: FileStatus,
    /// Whether the change is in the index
    pub staged: bool,
}

impl StatusEntry {
    /// Staged entries first, then by path.
    pub fn display_order(a: &StatusEntry, b: &StatusEntry) -> Ordering {
        b.staged.cmp(&a.staged).then_with(|| a.path.cmp(&b.path))
    }
}

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub owner: String,
    pub name: String,
}

/// Git repository wrapper
pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepo").field("root", &self.root).finish()
    }
}

impl GitRepo {
    /// Opens the repository containing `path`, searching upwards.
    pub fn open(path: &Path) -> GitResult<Self> {
        let start = if path.as_os_str().is_empty() {
            Path::new(".")
        } else {
            path
        };
        let repo = Repository::discover(start).map_err(|err| match err.code() {
            ErrorCode::NotFound => GitError::NotARepository,
            _ => GitError::Git(err),
        })?;
        let root = repo
            .workdir()
            .ok_or(GitError::NotARepository)?
            .to_path_buf();
        Ok(GitRepo { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current branch name, or the short commit id on a detached HEAD.
    pub fn current_branch(&self) -> GitResult<String> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(err) if err.code() == ErrorCode::UnbornBranch => {
                // No commits yet; HEAD still names the branch.
                let head = self.repo.find_reference("HEAD")?;
                let target = head.symbolic_target().unwrap_or("HEAD");
                return Ok(target.trim_start_matches("refs/heads/").to_string());
            }
            Err(err) => return Err(err.into()),
        };
        if head.is_branch() {
            Ok(head.shorthand().unwrap_or("HEAD").to_string())
        } else {
            let commit = head.peel_to_commit()?;
            Ok(format!("{:.7}", commit.id()))
        }
    }

    /// Working tree status, one entry per staged and per unstaged change.
    pub fn status(&self) -> GitResult<Vec<StatusEntry>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut entries = Vec::new();

        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                continue;
            };
            let status = entry.status();
            let path = PathBuf::from(path);

            if status.intersects(Status::CONFLICTED) {
                entries.push(StatusEntry {
                    path,
                    status: FileStatus::Conflicted,
                    staged: false,
                });
                continue;
            }
            if let Some(staged) = index_status(status) {
                entries.push(StatusEntry {
                    path: path.clone(),
                    status: staged,
                    staged: true,
                });
            }
            if let Some(unstaged) = worktree_status(status) {
                entries.push(StatusEntry {
                    path,
                    status: unstaged,
                    staged: false,
                });
            }
        }

        entries.sort_by(StatusEntry::display_order);
        Ok(entries)
    }

    /// Owner and name of the GitHub repository behind `origin`.
    pub fn origin(&self) -> GitResult<RemoteRepo> {
        let remote = self
            .repo
            .find_remote("origin")
            .map_err(|_| GitError::NoOrigin)?;
        remote
            .url()
            .and_then(parse_remote_url)
            .ok_or(GitError::NoOrigin)
    }
}

fn index_status(status: Status) -> Option<FileStatus> {
    if status.intersects(Status::INDEX_NEW) {
        Some(FileStatus::Added)
    } else if status.intersects(Status::INDEX_MODIFIED | Status::INDEX_TYPECHANGE) {
        Some(FileStatus::Modified)
    } else if status.intersects(Status::INDEX_DELETED) {
        Some(FileStatus::Deleted)
    } else if status.intersects(Status::INDEX_RENAMED) {
        Some(FileStatus::Renamed)
    } else {
        None
    }
}

fn worktree_status(status: Status) -> Option<FileStatus> {
    if status.intersects(Status::WT_NEW) {
        Some(FileStatus::Untracked)
    } else if status.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE) {
        Some(FileStatus::Modified)
    } else if status.intersects(Status::WT_DELETED) {
        Some(FileStatus::Deleted)
    } else if status.intersects(Status::WT_RENAMED) {
        Some(FileStatus::Renamed)
    } else {
        None
    }
}

/// Extracts owner and name from an https, ssh or scp-style remote URL.
///
/// ```
/// use panedeck_widgets::repo::parse_remote_url;
///
/// let remote = parse_remote_url("git@github.com:octo/hello.git").unwrap();
/// assert_eq!((remote.owner.as_str(), remote.name.as_str()), ("octo", "hello"));
/// ```
pub fn parse_remote_url(url: &str) -> Option<RemoteRepo> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let path = match trimmed.split_once("://") {
        Some((_, rest)) => rest.split_once('/')?.1,
        None => trimmed.split_once(':')?.1,
    };
    let mut parts = path.rsplit('/');
    let name = parts.next().filter(|s| !s.is_empty())?;
    let owner = parts.next().filter(|s| !s.is_empty())?;
    Some(RemoteRepo {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}
