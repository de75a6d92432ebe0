//! Read-side git handlers: status, diff, log, show

use chrono::Utc;
use git2::{DiffOptions, Repository, Sort, StatusOptions};

use crate::dates::parse_timestamp;
use crate::types::*;

use super::{format_commit, head_branch_name, head_tree, is_unborn, patch_text};

/// Describe the working tree and index like `git status`
pub fn git_status(repo: &Repository) -> GitResult<String> {
    Ok(status_report(repo)?.to_string())
}

/// Collect the working tree and index state
pub fn status_report(repo: &Repository) -> GitResult<StatusReport> {
    let head = match repo.head() {
        Ok(head) if head.is_branch() => {
            HeadState::Branch(head.shorthand().unwrap_or("HEAD").to_string())
        }
        Ok(head) => {
            let commit = head.peel_to_commit()?;
            let short = commit.as_object().short_id()?;
            HeadState::Detached(short.as_str().unwrap_or("").to_string())
        }
        Err(e) if is_unborn(&e) => {
            HeadState::Unborn(head_branch_name(repo)?.unwrap_or_else(|| "HEAD".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut status_opts = StatusOptions::new();
    status_opts
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .include_unmodified(false)
        .renames_head_to_index(true);

    let statuses = repo.statuses(Some(&mut status_opts))?;

    let mut staged = Vec::new();
    let mut unstaged = Vec::new();
    let mut untracked = Vec::new();
    let mut conflicted = Vec::new();

    for entry in statuses.iter() {
        let path = entry.path().unwrap_or("").to_string();
        let status = entry.status();

        if status.is_conflicted() {
            conflicted.push(path);
            continue;
        }
        if status.is_wt_new() {
            untracked.push(path);
            continue;
        }

        let index_kind = if status.is_index_new() {
            Some(ChangeKind::New)
        } else if status.is_index_modified() {
            Some(ChangeKind::Modified)
        } else if status.is_index_deleted() {
            Some(ChangeKind::Deleted)
        } else if status.is_index_renamed() {
            Some(ChangeKind::Renamed)
        } else if status.is_index_typechange() {
            Some(ChangeKind::Typechange)
        } else {
            None
        };

        if let Some(kind) = index_kind {
            let old_path = if kind == ChangeKind::Renamed {
                entry
                    .head_to_index()
                    .and_then(|d| d.old_file().path().map(|p| p.to_string_lossy().to_string()))
            } else {
                None
            };
            let path = entry
                .head_to_index()
                .and_then(|d| d.new_file().path().map(|p| p.to_string_lossy().to_string()))
                .unwrap_or_else(|| path.clone());
            staged.push(FileChange {
                path,
                kind,
                old_path,
            });
        }

        let worktree_kind = if status.is_wt_modified() {
            Some(ChangeKind::Modified)
        } else if status.is_wt_deleted() {
            Some(ChangeKind::Deleted)
        } else if status.is_wt_renamed() {
            Some(ChangeKind::Renamed)
        } else if status.is_wt_typechange() {
            Some(ChangeKind::Typechange)
        } else {
            None
        };

        if let Some(kind) = worktree_kind {
            unstaged.push(FileChange {
                path: path.clone(),
                kind,
                old_path: None,
            });
        }
    }

    Ok(StatusReport {
        head,
        staged,
        unstaged,
        untracked,
        conflicted,
    })
}

fn diff_options(context_lines: u32) -> DiffOptions {
    let mut opts = DiffOptions::new();
    opts.context_lines(context_lines);
    opts
}

/// Changes in the working tree that are not yet staged
pub fn git_diff_unstaged(repo: &Repository, context_lines: u32) -> GitResult<String> {
    let mut opts = diff_options(context_lines);
    let diff = repo.diff_index_to_workdir(None, Some(&mut opts))?;
    patch_text(&diff)
}

/// Changes staged in the index relative to HEAD
pub fn git_diff_staged(repo: &Repository, context_lines: u32) -> GitResult<String> {
    let mut opts = diff_options(context_lines);
    let tree = head_tree(repo)?;
    let diff = repo.diff_tree_to_index(tree.as_ref(), None, Some(&mut opts))?;
    patch_text(&diff)
}

/// Differences between `target` and the working tree, index included
pub fn git_diff(repo: &Repository, target: &str, context_lines: u32) -> GitResult<String> {
    let target_tree = repo
        .revparse_single(target)
        .map_err(|_| GitError::RefNotFound(target.to_string()))?
        .peel_to_tree()?;

    let mut opts = diff_options(context_lines);
    let diff = repo.diff_tree_to_workdir_with_index(Some(&target_tree), Some(&mut opts))?;
    patch_text(&diff)
}

/// Recent commits reachable from HEAD, newest first
///
/// `start_timestamp` and `end_timestamp` bound the committer date and accept
/// anything [`parse_timestamp`] does.
pub fn git_log(
    repo: &Repository,
    max_count: usize,
    start_timestamp: Option<&str>,
    end_timestamp: Option<&str>,
) -> GitResult<Vec<String>> {
    let now = Utc::now();
    let since = start_timestamp
        .map(|s| parse_timestamp(s, now))
        .transpose()?
        .map(|dt| dt.timestamp());
    let until = end_timestamp
        .map(|s| parse_timestamp(s, now))
        .transpose()?
        .map(|dt| dt.timestamp());

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(Sort::TIME)?;

    let mut entries = Vec::new();
    for oid in revwalk {
        if entries.len() >= max_count {
            break;
        }

        let commit = repo.find_commit(oid?)?;
        let committed = commit.committer().when().seconds();

        if since.is_some_and(|since| committed < since) {
            continue;
        }
        if until.is_some_and(|until| committed > until) {
            continue;
        }

        entries.push(format_commit(&commit));
    }

    tracing::debug!(count = entries.len(), "Collected log entries");
    Ok(entries)
}

/// Commit header and patch for a single revision
pub fn git_show(repo: &Repository, revision: &str) -> GitResult<String> {
    let commit = repo
        .revparse_single(revision)
        .map_err(|_| GitError::RefNotFound(revision.to_string()))?
        .peel_to_commit()?;

    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() == 0 {
        None
    } else {
        Some(commit.parent(0)?.tree()?)
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

    let mut output = format_commit(&commit);
    let patch = patch_text(&diff)?;
    if !patch.is_empty() {
        output.push('\n');
        output.push_str(&patch);
    }
    Ok(output)
}
