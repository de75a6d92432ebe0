//! Branch and repository handlers: branch listing, create, checkout, init

use std::path::Path;

use git2::{build::CheckoutBuilder, Branch, BranchType, Oid, Repository};

use crate::types::*;

use super::head_branch_name;

/// Create `branch_name` at `base_branch`, or at HEAD when no base is given
pub fn git_create_branch(
    repo: &Repository,
    branch_name: &str,
    base_branch: Option<&str>,
) -> GitResult<String> {
    let (base_name, base_commit) = match base_branch {
        Some(base) => {
            let commit = repo
                .revparse_single(base)
                .map_err(|_| GitError::RefNotFound(base.to_string()))?
                .peel_to_commit()?;
            (base.to_string(), commit)
        }
        None => {
            let head = repo.head()?;
            let name = head.shorthand().unwrap_or("HEAD").to_string();
            (name, head.peel_to_commit()?)
        }
    };

    repo.branch(branch_name, &base_commit, false)?;

    tracing::debug!(branch = branch_name, base = %base_name, "Created branch");
    Ok(format!(
        "Created branch '{}' from '{}'",
        branch_name, base_name
    ))
}

/// Switch HEAD and the working tree to a local branch
///
/// A missing local branch is created from a uniquely named remote-tracking
/// branch, so `feature` checks out `origin/feature`.
pub fn git_checkout(repo: &Repository, branch_name: &str) -> GitResult<String> {
    let branch = match repo.find_branch(branch_name, BranchType::Local) {
        Ok(branch) => branch,
        Err(e) if e.code() == git2::ErrorCode::NotFound => track_remote(repo, branch_name)?,
        Err(e) => return Err(e.into()),
    };

    let reference = branch.into_reference();
    let refname = reference
        .name()
        .ok_or_else(|| GitError::InvalidRef(branch_name.to_string()))?
        .to_string();
    let commit = reference.peel_to_commit()?;

    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;
    repo.set_head(&refname)?;

    tracing::debug!(branch = branch_name, "Checked out branch");
    Ok(format!("Switched to branch '{}'", branch_name))
}

fn track_remote<'r>(repo: &'r Repository, branch_name: &str) -> GitResult<Branch<'r>> {
    let mut candidates = Vec::new();

    for remote in repo.remotes()?.iter().flatten() {
        let name = format!("{}/{}", remote, branch_name);
        match repo.find_branch(&name, BranchType::Remote) {
            Ok(remote_branch) => candidates.push(remote_branch),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    if candidates.len() != 1 {
        return Err(GitError::BranchNotFound(branch_name.to_string()));
    }
    let remote_branch = candidates.remove(0);
    let upstream = remote_branch
        .name()?
        .ok_or_else(|| GitError::InvalidRef(branch_name.to_string()))?
        .to_string();
    let commit = remote_branch.get().peel_to_commit()?;

    let mut local = repo.branch(branch_name, &commit, false)?;
    local.set_upstream(Some(&upstream))?;

    tracing::info!(branch = branch_name, %upstream, "Created tracking branch");
    Ok(local)
}

/// Create a repository at `path`, making directories as needed
pub fn git_init(path: &Path) -> GitResult<String> {
    std::fs::create_dir_all(path)?;
    let repo = Repository::init(path)?;
    Ok(format!(
        "Initialized empty Git repository in {}",
        repo.path().display()
    ))
}

/// List branches like `git branch`, optionally filtered by a commit
///
/// `contains` keeps branches whose tip is the commit or descends from it;
/// `not_contains` drops them.
pub fn git_branch(
    repo: &Repository,
    kind: BranchKind,
    contains: Option<&str>,
    not_contains: Option<&str>,
) -> GitResult<String> {
    let contains = contains.map(|rev| resolve_commit(repo, rev)).transpose()?;
    let not_contains = not_contains
        .map(|rev| resolve_commit(repo, rev))
        .transpose()?;
    let current = head_branch_name(repo)?;

    let mut lines = Vec::new();

    if kind.includes_local() {
        let mut locals = Vec::new();
        for entry in repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(String::from) else {
                continue;
            };
            let Some(tip) = branch.get().target() else {
                continue;
            };
            if keep_branch(repo, tip, contains, not_contains)? {
                locals.push(name);
            }
        }
        locals.sort();

        for name in locals {
            let marker = if current.as_deref() == Some(name.as_str()) {
                "* "
            } else {
                "  "
            };
            lines.push(format!("{}{}", marker, name));
        }
    }

    if kind.includes_remote() {
        let prefix = if kind == BranchKind::All { "remotes/" } else { "" };
        let mut remotes = Vec::new();
        for entry in repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(String::from) else {
                continue;
            };

            let reference = branch.get();
            let Some(tip) = reference.resolve()?.target() else {
                continue;
            };
            if !keep_branch(repo, tip, contains, not_contains)? {
                continue;
            }

            match reference.symbolic_target() {
                Some(target) => {
                    let target = target.strip_prefix("refs/remotes/").unwrap_or(target);
                    remotes.push(format!("{}{} -> {}", prefix, name, target));
                }
                None => remotes.push(format!("{}{}", prefix, name)),
            }
        }
        remotes.sort();
        lines.extend(remotes.into_iter().map(|name| format!("  {}", name)));
    }

    Ok(lines.join("\n"))
}

fn resolve_commit(repo: &Repository, rev: &str) -> GitResult<Oid> {
    let commit = repo
        .revparse_single(rev)
        .map_err(|_| GitError::RefNotFound(rev.to_string()))?
        .peel_to_commit()?;
    Ok(commit.id())
}

fn branch_contains(repo: &Repository, tip: Oid, commit: Oid) -> GitResult<bool> {
    Ok(tip == commit || repo.graph_descendant_of(tip, commit)?)
}

fn keep_branch(
    repo: &Repository,
    tip: Oid,
    contains: Option<Oid>,
    not_contains: Option<Oid>,
) -> GitResult<bool> {
    if let Some(commit) = contains {
        if !branch_contains(repo, tip, commit)? {
            return Ok(false);
        }
    }
    if let Some(commit) = not_contains {
        if branch_contains(repo, tip, commit)? {
            return Ok(false);
        }
    }
    Ok(true)
}
