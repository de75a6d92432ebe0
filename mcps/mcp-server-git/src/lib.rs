//! Git MCP Library
//!
//! Thin wrappers around libgit2 for status, diffs, history, staging,
//! commits and branches, exposed as MCP tools.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_server_git::{handlers, GitMcpServer};
//!
//! let repo = git2::Repository::open("path/to/repo")?;
//! println!("{}", handlers::git_status(&repo)?);
//!
//! let server = GitMcpServer::new();
//! // Serve via stdio or call tools in-process through EmbeddableMcp
//! ```

pub mod config;
pub mod dates;
pub mod guard;
pub mod handlers;
pub mod params;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::GitMcpServer;

pub use config::Config;
pub use types::{BranchKind, GitError, GitResult};

// Re-export parameter types for direct API usage
pub use params::*;
