//! Repository guard - access policy for tool calls
//!
//! Restricts tool calls to a single allowed repository when one is
//! configured, and rejects revision arguments that look like options.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::types::{GitError, GitResult};

/// Validates repository paths and revision arguments before they reach git
#[derive(Debug, Clone, Default)]
pub struct RepoGuard {
    /// Canonical allowed repository root, if restricted
    allowed: Option<PathBuf>,
}

impl RepoGuard {
    /// Guard that allows any repository
    pub fn unrestricted() -> Self {
        Self { allowed: None }
    }

    /// Guard restricted to `root`, which must open as a git repository
    pub fn restricted_to(root: &Path) -> GitResult<Self> {
        Repository::open(root).map_err(|_| GitError::RepoNotFound(root.display().to_string()))?;
        let canonical = root.canonicalize()?;
        tracing::info!("Using repository at {}", canonical.display());
        Ok(Self {
            allowed: Some(canonical),
        })
    }

    pub fn allowed_repository(&self) -> Option<&Path> {
        self.allowed.as_deref()
    }

    /// Check that `repo_path` is the allowed repository or lies inside it
    pub fn check_path(&self, repo_path: &str) -> GitResult<PathBuf> {
        let resolved = resolve_existing_prefix(Path::new(repo_path))?;

        if let Some(allowed) = &self.allowed {
            if !resolved.starts_with(allowed) {
                return Err(GitError::OutsideRepository {
                    path: repo_path.to_string(),
                    allowed: allowed.display().to_string(),
                });
            }
        }

        Ok(resolved)
    }

    /// Check the path and open the repository found there
    pub fn open(&self, repo_path: &str) -> GitResult<Repository> {
        let resolved = self.check_path(repo_path)?;
        tracing::debug!(path = %resolved.display(), "Opening repository");
        Repository::open(&resolved).map_err(|_| GitError::RepoNotFound(repo_path.to_string()))
    }
}

/// Reject revision or branch arguments that git would read as an option
pub fn check_ref_arg(kind: &str, value: &str) -> GitResult<()> {
    if value.starts_with('-') {
        return Err(GitError::InvalidRef(format!(
            "{} '{}' cannot start with '-'",
            kind, value
        )));
    }
    Ok(())
}

/// Canonicalize a path that may not exist yet
///
/// The longest existing ancestor is canonicalized (resolving symlinks) and
/// the remaining components are appended lexically.
fn resolve_existing_prefix(path: &Path) -> GitResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(GitError::RepoNotFound(String::new()));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            for component in rest.iter().rev() {
                match component {
                    std::path::Component::ParentDir => {
                        resolved.pop();
                    }
                    std::path::Component::CurDir => {}
                    other => resolved.push(other),
                }
            }
            return Ok(resolved);
        }

        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                rest.push(last);
                existing = parent;
            }
            _ => return Err(GitError::RepoNotFound(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        dir
    }

    #[test]
    fn test_unrestricted_allows_any_path() {
        let dir = init_repo();
        let guard = RepoGuard::unrestricted();
        assert!(guard.open(dir.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_restricted_allows_root_and_children() {
        let dir = init_repo();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let guard = RepoGuard::restricted_to(dir.path()).unwrap();

        assert!(guard.check_path(dir.path().to_str().unwrap()).is_ok());
        assert!(guard
            .check_path(dir.path().join("sub").to_str().unwrap())
            .is_ok());
        assert!(guard
            .check_path(dir.path().join("not-yet-created").to_str().unwrap())
            .is_ok());
    }

    #[test]
    fn test_restricted_rejects_outside_paths() {
        let dir = init_repo();
        let other = init_repo();
        let guard = RepoGuard::restricted_to(dir.path()).unwrap();

        let result = guard.check_path(other.path().to_str().unwrap());
        assert!(matches!(result, Err(GitError::OutsideRepository { .. })));

        let escape = dir.path().join("..").join("elsewhere");
        let result = guard.check_path(escape.to_str().unwrap());
        assert!(matches!(result, Err(GitError::OutsideRepository { .. })));
    }

    #[test]
    fn test_restricted_requires_repository() {
        let dir = TempDir::new().unwrap();
        let result = RepoGuard::restricted_to(dir.path());
        assert!(matches!(result, Err(GitError::RepoNotFound(_))));
    }

    #[test]
    fn test_open_non_repository() {
        let dir = TempDir::new().unwrap();
        let guard = RepoGuard::unrestricted();
        let result = guard.open(dir.path().to_str().unwrap());
        assert!(matches!(result, Err(GitError::RepoNotFound(_))));
    }

    #[test]
    fn test_ref_arg_rejects_options() {
        assert!(check_ref_arg("target", "main").is_ok());
        assert!(check_ref_arg("target", "HEAD~1").is_ok());
        assert!(matches!(
            check_ref_arg("target", "--output=/tmp/x"),
            Err(GitError::InvalidRef(_))
        ));
    }
}
