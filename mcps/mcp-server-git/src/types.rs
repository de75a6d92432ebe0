//! Type definitions for mcp-server-git

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Branch Listing
// ============================================================================

/// Which branches `git_branch` should list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    /// Local branches only (`git branch`)
    Local,
    /// Remote-tracking branches only (`git branch -r`)
    Remote,
    /// Both, remotes prefixed with `remotes/` (`git branch -a`)
    All,
}

impl BranchKind {
    pub fn includes_local(self) -> bool {
        matches!(self, BranchKind::Local | BranchKind::All)
    }

    pub fn includes_remote(self) -> bool {
        matches!(self, BranchKind::Remote | BranchKind::All)
    }
}

// ============================================================================
// Status Report
// ============================================================================

/// Kind of change recorded for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
    Renamed,
    Typechange,
}

impl ChangeKind {
    fn label(self) -> &'static str {
        match self {
            ChangeKind::New => "new file:",
            ChangeKind::Modified => "modified:",
            ChangeKind::Deleted => "deleted:",
            ChangeKind::Renamed => "renamed:",
            ChangeKind::Typechange => "typechange:",
        }
    }
}

/// A staged or unstaged change to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    /// Previous path, for renames
    pub old_path: Option<String>,
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.old_path) {
            (ChangeKind::Renamed, Some(old)) => {
                write!(f, "\t{:<12}{} -> {}", self.kind.label(), old, self.path)
            }
            _ => write!(f, "\t{:<12}{}", self.kind.label(), self.path),
        }
    }
}

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// On a branch that has at least one commit
    Branch(String),
    /// On a branch with no commits yet
    Unborn(String),
    /// Detached at the given abbreviated commit id
    Detached(String),
}

/// Working tree and index state, rendered like `git status`
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub head: HeadState,
    pub staged: Vec<FileChange>,
    pub unstaged: Vec<FileChange>,
    pub untracked: Vec<String>,
    pub conflicted: Vec<String>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.unstaged.is_empty()
            && self.untracked.is_empty()
            && self.conflicted.is_empty()
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.head {
            HeadState::Branch(name) => writeln!(f, "On branch {}", name)?,
            HeadState::Unborn(name) => {
                writeln!(f, "On branch {}", name)?;
                writeln!(f)?;
                writeln!(f, "No commits yet")?;
            }
            HeadState::Detached(short) => writeln!(f, "HEAD detached at {}", short)?,
        }

        if !self.staged.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes to be committed:")?;
            for change in &self.staged {
                writeln!(f, "{}", change)?;
            }
        }

        if !self.conflicted.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unmerged paths:")?;
            for path in &self.conflicted {
                writeln!(f, "\t{:<16}{}", "both modified:", path)?;
            }
        }

        if !self.unstaged.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes not staged for commit:")?;
            for change in &self.unstaged {
                writeln!(f, "{}", change)?;
            }
        }

        if !self.untracked.is_empty() {
            writeln!(f)?;
            writeln!(f, "Untracked files:")?;
            for path in &self.untracked {
                writeln!(f, "\t{}", path)?;
            }
        }

        if self.is_clean() {
            writeln!(f)?;
            match self.head {
                HeadState::Unborn(_) => write!(f, "nothing to commit")?,
                _ => write!(f, "nothing to commit, working tree clean")?,
            }
        } else if self.staged.is_empty() && self.conflicted.is_empty() {
            writeln!(f)?;
            if self.unstaged.is_empty() {
                write!(f, "nothing added to commit but untracked files present")?;
            } else {
                write!(f, "no changes added to commit")?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Reference not found: {0}")]
    RefNotFound(String),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("Invalid reference: {0}")]
    InvalidRef(String),

    #[error("Pathspec '{0}' did not match any files")]
    PathspecNotMatched(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Repository path '{path}' is outside the allowed repository '{allowed}'")]
    OutsideRepository { path: String, allowed: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn report(head: HeadState) -> StatusReport {
        StatusReport {
            head,
            staged: Vec::new(),
            unstaged: Vec::new(),
            untracked: Vec::new(),
            conflicted: Vec::new(),
        }
    }

    #[test]
    fn test_clean_report() {
        let text = report(HeadState::Branch("main".to_string())).to_string();
        assert!(text.starts_with("On branch main\n"));
        assert!(text.ends_with("nothing to commit, working tree clean"));
    }

    #[test]
    fn test_unborn_report() {
        let text = report(HeadState::Unborn("main".to_string())).to_string();
        assert!(text.contains("No commits yet"));
        assert!(!text.contains("working tree clean"));
    }

    #[test]
    fn test_sections_render() {
        let mut status = report(HeadState::Detached("abc1234".to_string()));
        status.staged.push(FileChange {
            path: "new.rs".to_string(),
            kind: ChangeKind::Renamed,
            old_path: Some("old.rs".to_string()),
        });
        status.untracked.push("scratch.txt".to_string());

        let text = status.to_string();
        assert!(text.starts_with("HEAD detached at abc1234"));
        assert!(text.contains("Changes to be committed:"));
        assert!(text.contains("old.rs -> new.rs"));
        assert!(text.contains("Untracked files:\n\tscratch.txt"));
        assert!(!text.contains("nothing to commit"));
    }

    #[test]
    fn test_untracked_only_footer() {
        let mut status = report(HeadState::Branch("main".to_string()));
        status.untracked.push("notes.txt".to_string());

        let text = status.to_string();
        assert!(text.ends_with("nothing added to commit but untracked files present"));
    }

    #[test]
    fn test_unstaged_only_footer() {
        let mut status = report(HeadState::Branch("main".to_string()));
        status.unstaged.push(FileChange {
            path: "lib.rs".to_string(),
            kind: ChangeKind::Modified,
            old_path: None,
        });
        status.untracked.push("notes.txt".to_string());

        let text = status.to_string();
        assert!(text.ends_with("no changes added to commit"));
    }

    #[test]
    fn test_branch_kind_deserialize() {
        let kind: BranchKind = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(kind, BranchKind::Remote);
        assert!(kind.includes_remote());
        assert!(!kind.includes_local());
        assert!(serde_json::from_str::<BranchKind>("\"tags\"").is_err());
    }
}
