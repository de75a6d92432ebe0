//! MCP Server implementation for git repository interaction
//!
//! Each tool checks its arguments against the repository guard, opens the
//! repository and delegates to the handlers module.

use git2::Repository;
use mcp_common::{
    async_trait, listing_success, text_success, EmbeddableError, EmbeddableMcp,
    EmbeddableResult, McpError, ResultExt,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use std::path::Path;

use crate::config::{Config, Defaults};
use crate::guard::{check_ref_arg, RepoGuard};
use crate::handlers;
use crate::params::*;
use crate::types::GitResult;

/// The Git MCP Server
#[derive(Clone)]
pub struct GitMcpServer {
    guard: RepoGuard,
    defaults: Defaults,
    tool_router: ToolRouter<Self>,
}

impl GitMcpServer {
    /// Server with default settings that accepts any repository path
    pub fn new() -> Self {
        Self::with_guard(RepoGuard::unrestricted(), Defaults::default())
    }

    /// Server built from loaded configuration
    pub fn from_config(config: &Config) -> GitResult<Self> {
        let guard = match &config.repository {
            Some(root) => RepoGuard::restricted_to(root)?,
            None => RepoGuard::unrestricted(),
        };
        Ok(Self::with_guard(guard, config.defaults.clone()))
    }

    pub fn with_guard(guard: RepoGuard, defaults: Defaults) -> Self {
        Self {
            guard,
            defaults,
            tool_router: Self::tool_router(),
        }
    }

    pub fn allowed_repository(&self) -> Option<&Path> {
        self.guard.allowed_repository()
    }

    fn open(&self, repo_path: &str) -> Result<Repository, McpError> {
        self.guard.open(repo_path).to_mcp_err()
    }
}

fn check_ref(kind: &str, value: &str) -> Result<(), McpError> {
    check_ref_arg(kind, value).to_mcp_err()
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl GitMcpServer {
    #[tool(description = "Shows the working tree status")]
    async fn git_status(
        &self,
        Parameters(params): Parameters<StatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let status = handlers::git_status(&repo).to_mcp_err()?;
        Ok(text_success(format!("Repository status:\n{}", status)))
    }

    #[tool(description = "Shows changes in the working directory that are not yet staged")]
    async fn git_diff_unstaged(
        &self,
        Parameters(params): Parameters<DiffUnstagedParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let context = params.context_lines.unwrap_or(self.defaults.context_lines);
        let diff = handlers::git_diff_unstaged(&repo, context).to_mcp_err()?;
        Ok(text_success(format!("Unstaged changes:\n{}", diff)))
    }

    #[tool(description = "Shows changes that are staged for commit")]
    async fn git_diff_staged(
        &self,
        Parameters(params): Parameters<DiffStagedParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let context = params.context_lines.unwrap_or(self.defaults.context_lines);
        let diff = handlers::git_diff_staged(&repo, context).to_mcp_err()?;
        Ok(text_success(format!("Staged changes:\n{}", diff)))
    }

    #[tool(description = "Shows differences between a branch or commit and the working tree")]
    async fn git_diff(
        &self,
        Parameters(params): Parameters<DiffParams>,
    ) -> Result<CallToolResult, McpError> {
        check_ref("target", &params.target)?;
        let repo = self.open(&params.repo_path)?;
        let context = params.context_lines.unwrap_or(self.defaults.context_lines);
        let diff =
            handlers::git_diff(&repo, &params.target, context).to_mcp_err()?;
        Ok(text_success(format!("Diff with {}:\n{}", params.target, diff)))
    }

    #[tool(description = "Records staged changes to the repository")]
    async fn git_commit(
        &self,
        Parameters(params): Parameters<CommitParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let result = handlers::git_commit(&repo, &params.message).to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(description = "Adds file contents to the staging area")]
    async fn git_add(
        &self,
        Parameters(params): Parameters<AddParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let result = handlers::git_add(&repo, &params.files).to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(description = "Unstages all staged changes")]
    async fn git_reset(
        &self,
        Parameters(params): Parameters<ResetParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let result = handlers::git_reset(&repo).to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(
        description = "Shows the commit logs, optionally limited to a time window"
    )]
    async fn git_log(
        &self,
        Parameters(params): Parameters<LogParams>,
    ) -> Result<CallToolResult, McpError> {
        let repo = self.open(&params.repo_path)?;
        let max_count = params.max_count.unwrap_or(self.defaults.max_count);
        let entries = handlers::git_log(
            &repo,
            max_count,
            params.start_timestamp.as_deref(),
            params.end_timestamp.as_deref(),
        )
        .to_mcp_err()?;
        Ok(listing_success("Commit history:", &entries))
    }

    #[tool(description = "Creates a new branch from an optional base branch")]
    async fn git_create_branch(
        &self,
        Parameters(params): Parameters<CreateBranchParams>,
    ) -> Result<CallToolResult, McpError> {
        check_ref("branch name", &params.branch_name)?;
        if let Some(base) = &params.base_branch {
            check_ref("base branch", base)?;
        }
        let repo = self.open(&params.repo_path)?;
        let result = handlers::git_create_branch(
            &repo,
            &params.branch_name,
            params.base_branch.as_deref(),
        )
        .to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(description = "Switches branches")]
    async fn git_checkout(
        &self,
        Parameters(params): Parameters<CheckoutParams>,
    ) -> Result<CallToolResult, McpError> {
        check_ref("branch name", &params.branch_name)?;
        let repo = self.open(&params.repo_path)?;
        let result =
            handlers::git_checkout(&repo, &params.branch_name).to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(description = "Shows the contents of a commit")]
    async fn git_show(
        &self,
        Parameters(params): Parameters<ShowParams>,
    ) -> Result<CallToolResult, McpError> {
        check_ref("revision", &params.revision)?;
        let repo = self.open(&params.repo_path)?;
        let result = handlers::git_show(&repo, &params.revision).to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(description = "Initializes a new git repository")]
    async fn git_init(
        &self,
        Parameters(params): Parameters<InitParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = self
            .guard
            .check_path(&params.repo_path)
            .to_mcp_err()?;
        let result = handlers::git_init(&path).to_mcp_err()?;
        Ok(text_success(result))
    }

    #[tool(description = "Lists local, remote or all branches, optionally filtered by a commit")]
    async fn git_branch(
        &self,
        Parameters(params): Parameters<BranchParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(rev) = &params.contains {
            check_ref("contains", rev)?;
        }
        if let Some(rev) = &params.not_contains {
            check_ref("not_contains", rev)?;
        }
        let repo = self.open(&params.repo_path)?;
        let result = handlers::git_branch(
            &repo,
            params.branch_type,
            params.contains.as_deref(),
            params.not_contains.as_deref(),
        )
        .to_mcp_err()?;
        Ok(text_success(result))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for GitMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Git MCP server for reading and manipulating local repositories via libgit2. \
                 Every tool takes repo_path; when the server was started with --repository, \
                 paths outside that repository are rejected."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for GitMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for GitMcpServer {
    fn server_name(&self) -> &str {
        "git"
    }

    fn server_description(&self) -> Option<&str> {
        Some(
            "Git MCP Server - status, diff, log, show, staging, commits and \
             branch management for local repositories.",
        )
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "git_status" => {
                let params: StatusParams = serde_json::from_value(params)?;
                self.git_status(Parameters(params)).await.map_err(Into::into)
            }
            "git_diff_unstaged" => {
                let params: DiffUnstagedParams = serde_json::from_value(params)?;
                self.git_diff_unstaged(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "git_diff_staged" => {
                let params: DiffStagedParams = serde_json::from_value(params)?;
                self.git_diff_staged(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "git_diff" => {
                let params: DiffParams = serde_json::from_value(params)?;
                self.git_diff(Parameters(params)).await.map_err(Into::into)
            }
            "git_commit" => {
                let params: CommitParams = serde_json::from_value(params)?;
                self.git_commit(Parameters(params)).await.map_err(Into::into)
            }
            "git_add" => {
                let params: AddParams = serde_json::from_value(params)?;
                self.git_add(Parameters(params)).await.map_err(Into::into)
            }
            "git_reset" => {
                let params: ResetParams = serde_json::from_value(params)?;
                self.git_reset(Parameters(params)).await.map_err(Into::into)
            }
            "git_log" => {
                let params: LogParams = serde_json::from_value(params)?;
                self.git_log(Parameters(params)).await.map_err(Into::into)
            }
            "git_create_branch" => {
                let params: CreateBranchParams = serde_json::from_value(params)?;
                self.git_create_branch(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "git_checkout" => {
                let params: CheckoutParams = serde_json::from_value(params)?;
                self.git_checkout(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "git_show" => {
                let params: ShowParams = serde_json::from_value(params)?;
                self.git_show(Parameters(params)).await.map_err(Into::into)
            }
            "git_init" => {
                let params: InitParams = serde_json::from_value(params)?;
                self.git_init(Parameters(params)).await.map_err(Into::into)
            }
            "git_branch" => {
                let params: BranchParams = serde_json::from_value(params)?;
                self.git_branch(Parameters(params)).await.map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text())
            .map(|t| t.text.clone())
            .collect::<Vec<_>>()
            .join("")
    }

    fn repo_with_commit() -> TempDir {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        std::fs::write(dir.path().join("test.txt"), "test").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("test.txt")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
            .unwrap();
        dir
    }

    fn path_of(dir: &TempDir) -> String {
        dir.path().to_string_lossy().to_string()
    }

    #[test]
    fn test_embeddable_server_name() {
        let server = GitMcpServer::new();
        assert_eq!(server.server_name(), "git");
        assert!(server.allowed_repository().is_none());
    }

    #[test]
    fn test_embeddable_list_tools() {
        let server = GitMcpServer::new();
        let tools = server.list_tools();
        assert_eq!(tools.len(), 13);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        for expected in [
            "git_status",
            "git_diff_unstaged",
            "git_diff_staged",
            "git_diff",
            "git_commit",
            "git_add",
            "git_reset",
            "git_log",
            "git_create_branch",
            "git_checkout",
            "git_show",
            "git_init",
            "git_branch",
        ] {
            assert!(tool_names.contains(&expected), "missing tool {}", expected);
        }
    }

    #[tokio::test]
    async fn test_call_status_prefix() {
        let dir = repo_with_commit();
        let server = GitMcpServer::new();
        let result = server
            .call_tool("git_status", json!({ "repo_path": path_of(&dir) }))
            .await
            .unwrap();

        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        let text = text_of(&result);
        assert!(text.starts_with("Repository status:\n"));
        assert!(text.contains("On branch"));
    }

    #[tokio::test]
    async fn test_call_diff_unstaged_empty() {
        let dir = repo_with_commit();
        let server = GitMcpServer::new();
        let result = server
            .call_tool("git_diff_unstaged", json!({ "repo_path": path_of(&dir) }))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "Unstaged changes:\n");
    }

    #[tokio::test]
    async fn test_call_log_header() {
        let dir = repo_with_commit();
        let server = GitMcpServer::new();
        let result = server
            .call_tool(
                "git_log",
                json!({ "repo_path": path_of(&dir), "max_count": 5 }),
            )
            .await
            .unwrap();

        let text = text_of(&result);
        assert!(text.starts_with("Commit history:\nCommit: "));
        assert!(text.contains("initial commit"));
    }

    #[tokio::test]
    async fn test_call_add_and_commit() {
        let dir = repo_with_commit();
        std::fs::write(dir.path().join("new.txt"), "new").unwrap();
        let server = GitMcpServer::new();

        let added = server
            .call_tool(
                "git_add",
                json!({ "repo_path": path_of(&dir), "files": ["new.txt"] }),
            )
            .await
            .unwrap();
        assert_eq!(text_of(&added), "Files staged successfully");

        let committed = server
            .call_tool(
                "git_commit",
                json!({ "repo_path": path_of(&dir), "message": "add new" }),
            )
            .await
            .unwrap();
        assert!(text_of(&committed).starts_with("Changes committed successfully with hash "));
    }

    #[tokio::test]
    async fn test_call_init() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("fresh");
        let server = GitMcpServer::new();

        let result = server
            .call_tool(
                "git_init",
                json!({ "repo_path": target.to_string_lossy() }),
            )
            .await
            .unwrap();

        assert!(text_of(&result).starts_with("Initialized empty Git repository in "));
        assert!(Repository::open(&target).is_ok());
    }

    #[tokio::test]
    async fn test_call_rejects_option_like_target() {
        let dir = repo_with_commit();
        let server = GitMcpServer::new();
        let result = server
            .call_tool(
                "git_diff",
                json!({ "repo_path": path_of(&dir), "target": "--output=/tmp/pwned" }),
            )
            .await;
        assert!(matches!(result, Err(EmbeddableError::McpError(_))));
    }

    #[tokio::test]
    async fn test_restricted_server_rejects_other_repo() {
        let allowed = repo_with_commit();
        let other = repo_with_commit();
        let config = Config {
            repository: Some(allowed.path().to_path_buf()),
            ..Default::default()
        };
        let server = GitMcpServer::from_config(&config).unwrap();

        let ok = server
            .call_tool("git_status", json!({ "repo_path": path_of(&allowed) }))
            .await;
        assert!(ok.is_ok());

        let denied = server
            .call_tool("git_status", json!({ "repo_path": path_of(&other) }))
            .await;
        match denied {
            Err(EmbeddableError::McpError(message)) => {
                assert!(message.contains("outside the allowed repository"))
            }
            unexpected => panic!("expected rejection, got {:?}", unexpected.map(|r| text_of(&r))),
        }
    }

    #[tokio::test]
    async fn test_invalid_branch_type() {
        let dir = repo_with_commit();
        let server = GitMcpServer::new();
        let result = server
            .call_tool(
                "git_branch",
                json!({ "repo_path": path_of(&dir), "branch_type": "tags" }),
            )
            .await;
        assert!(matches!(result, Err(EmbeddableError::SerdeError(_))));
    }

    #[tokio::test]
    async fn test_embeddable_unknown_tool() {
        let server = GitMcpServer::new();
        let result = server
            .call_tool("git_push", json!({ "repo_path": "." }))
            .await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }
}
