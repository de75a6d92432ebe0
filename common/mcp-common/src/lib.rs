//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] with `-v` style verbosity
//! - **Results**: helpers for text `CallToolResult` responses
//! - **Errors**: [`IntoMcpError`] / [`ResultExt`] for mapping domain errors to MCP codes
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{
    internal_error, invalid_params, invalid_request, IntoMcpError, McpResult, ResultExt,
};
pub use init::{init_tracing, level_for_verbosity};
pub use result::{listing_success, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
