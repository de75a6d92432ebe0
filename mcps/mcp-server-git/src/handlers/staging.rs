//! Index-changing git handlers: add, reset, commit

use std::path::Path;

use git2::{Index, IndexAddOption, Pathspec, PathspecFlags, Repository, ResetType};

use crate::types::*;

use super::is_unborn;

/// Stage the given pathspecs; `.` stages everything
///
/// Deletions of tracked files matching a pathspec are staged as well.
pub fn git_add(repo: &Repository, files: &[String]) -> GitResult<String> {
    let mut index = repo.index()?;

    for spec in files {
        if !pathspec_matches(repo, &index, spec)? {
            return Err(GitError::PathspecNotMatched(spec.clone()));
        }
    }

    index.add_all(files.iter().map(String::as_str), IndexAddOption::DEFAULT, None)?;
    index.update_all(files.iter().map(String::as_str), None)?;
    index.write()?;

    tracing::debug!(?files, "Staged paths");
    Ok("Files staged successfully".to_string())
}

/// Whether `spec` names something in the working tree or the index
fn pathspec_matches(repo: &Repository, index: &Index, spec: &str) -> GitResult<bool> {
    if let Some(workdir) = repo.workdir() {
        if workdir.join(spec).exists() {
            return Ok(true);
        }
    }

    let pathspec = Pathspec::new([spec])?;
    let tracked = index.iter().any(|entry| {
        let path = String::from_utf8_lossy(&entry.path);
        pathspec.matches_path(Path::new(&*path), PathspecFlags::DEFAULT)
    });
    if tracked {
        return Ok(true);
    }

    let matched = pathspec
        .match_workdir(repo, PathspecFlags::NO_MATCH_ERROR)
        .is_ok();
    Ok(matched)
}

/// Unstage everything, leaving the working tree untouched
pub fn git_reset(repo: &Repository) -> GitResult<String> {
    match repo.head() {
        Ok(head) => {
            let commit = head.peel_to_commit()?;
            repo.reset(commit.as_object(), ResetType::Mixed, None)?;
        }
        Err(e) if is_unborn(&e) => {
            let mut index = repo.index()?;
            index.clear()?;
            index.write()?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok("All staged changes reset".to_string())
}

/// Record the index as a new commit on HEAD
pub fn git_commit(repo: &Repository, message: &str) -> GitResult<String> {
    let signature = repo.signature()?;

    let mut index = repo.index()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if is_unborn(&e) => None,
        Err(e) => return Err(e.into()),
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;

    tracing::debug!(%oid, "Created commit");
    Ok(format!("Changes committed successfully with hash {}", oid))
}
