//! Git operation handlers
//!
//! Each function takes an opened repository and a few plain arguments,
//! delegates to libgit2 and formats the outcome as text. The MCP tool
//! definitions in the server module wrap these.

mod branches;
mod core;
mod staging;

pub use self::branches::*;
pub use self::core::*;
pub use self::staging::*;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{Diff, DiffFormat, Repository, Tree};
use mcp_common::{internal_error, invalid_params, invalid_request, IntoMcpError, McpError};

use crate::types::{GitError, GitResult};

/// GitError maps to MCP error codes by cause: unknown names are invalid
/// params, policy violations are invalid requests, the rest is internal
impl IntoMcpError for GitError {
    fn into_mcp_error(self) -> McpError {
        match &self {
            GitError::RepoNotFound(_)
            | GitError::RefNotFound(_)
            | GitError::BranchNotFound(_)
            | GitError::PathspecNotMatched(_)
            | GitError::InvalidTimestamp(_) => invalid_params(self.to_string()),
            GitError::InvalidRef(_) | GitError::OutsideRepository { .. } => {
                invalid_request(self.to_string())
            }
            _ => internal_error(self.to_string()),
        }
    }
}

/// Convert git2::Time to a chrono DateTime, keeping the recorded offset
pub fn git_time_to_datetime(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(|| Utc::now().with_timezone(&offset))
}

/// Render the commit header shared by `git_log` and `git_show`
pub fn format_commit(commit: &git2::Commit) -> String {
    let author = commit.author();
    format!(
        "Commit: {}\nAuthor: {} <{}>\nDate: {}\nMessage: {}\n",
        commit.id(),
        author.name().unwrap_or(""),
        author.email().unwrap_or(""),
        git_time_to_datetime(author.when()).format("%Y-%m-%d %H:%M:%S%:z"),
        commit.message().unwrap_or("").trim_end(),
    )
}

/// Render a diff as unified patch text
pub fn patch_text(diff: &Diff) -> GitResult<String> {
    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if let '+' | '-' | ' ' = line.origin() {
            text.push(line.origin());
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;
    Ok(text)
}

/// Tree of the commit HEAD points at, or `None` on an unborn branch
pub fn head_tree(repo: &Repository) -> GitResult<Option<Tree<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_tree()?)),
        Err(e) if is_unborn(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Whether an error from `Repository::head` means the branch has no commits
pub(crate) fn is_unborn(e: &git2::Error) -> bool {
    matches!(
        e.code(),
        git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound
    )
}

/// Branch name HEAD refers to, even before the first commit
pub(crate) fn head_branch_name(repo: &Repository) -> GitResult<Option<String>> {
    let head = repo.find_reference("HEAD")?;
    Ok(head
        .symbolic_target()
        .and_then(|target| target.strip_prefix("refs/heads/"))
        .map(String::from))
}
