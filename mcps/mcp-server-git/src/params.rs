//! Parameter types for git MCP tools

use schemars::JsonSchema;
use serde::Deserialize;

use crate::types::BranchKind;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// Path to the git repository
    pub repo_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiffUnstagedParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Number of context lines around each change (default: 3)
    #[serde(default)]
    pub context_lines: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiffStagedParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Number of context lines around each change (default: 3)
    #[serde(default)]
    pub context_lines: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiffParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Branch, tag or commit to compare the working tree against
    pub target: String,
    /// Number of context lines around each change (default: 3)
    #[serde(default)]
    pub context_lines: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommitParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Commit message
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Paths to stage, relative to the repository root ("." stages everything)
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResetParams {
    /// Path to the git repository
    pub repo_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Maximum number of commits to return (default: 10)
    #[serde(default)]
    pub max_count: Option<usize>,
    /// Only commits after this time: ISO 8601 ('2024-01-15T14:30:00Z'),
    /// relative ('2 weeks ago', 'yesterday') or '@<unix seconds>'
    #[serde(default)]
    pub start_timestamp: Option<String>,
    /// Only commits before this time, same formats as start_timestamp
    #[serde(default)]
    pub end_timestamp: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateBranchParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Name of the new branch
    pub branch_name: String,
    /// Branch or commit to start from (defaults to the current branch)
    #[serde(default)]
    pub base_branch: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckoutParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Branch to switch to
    pub branch_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShowParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Revision to show (commit hash, branch or tag)
    pub revision: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InitParams {
    /// Directory to initialize as a git repository
    pub repo_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BranchParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Which branches to list: "local", "remote" or "all"
    pub branch_type: BranchKind,
    /// Only branches containing this commit
    #[serde(default)]
    pub contains: Option<String>,
    /// Only branches not containing this commit
    #[serde(default)]
    pub not_contains: Option<String>,
}
