//! Error handling utilities for MCP servers
//!
//! Servers implement [`IntoMcpError`] for their domain error type and use
//! [`ResultExt::to_mcp_err`] at the tool boundary.

use rmcp::ErrorData as McpError;

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Conversion of an error into an MCP error with a suitable code
///
/// ```rust,ignore
/// impl IntoMcpError for GitError {
///     fn into_mcp_error(self) -> McpError {
///         match &self {
///             GitError::RefNotFound(_) => invalid_params(self.to_string()),
///             _ => internal_error(self.to_string()),
///         }
///     }
/// }
/// ```
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for std::io::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(format!("IO error: {}", self))
    }
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        invalid_params(format!("JSON error: {}", self))
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(self.to_string())
    }
}

impl IntoMcpError for String {
    fn into_mcp_error(self) -> McpError {
        internal_error(self)
    }
}

/// Extension trait for Result types to convert to MCP errors
pub trait ResultExt<T> {
    /// Convert the error to an MCP error
    fn to_mcp_err(self) -> McpResult<T>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> McpResult<T> {
        self.map_err(IntoMcpError::into_mcp_error)
    }
}

/// Internal error: something failed while serving a valid request
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Invalid params: an argument names something that does not exist or cannot be parsed
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}

/// Invalid request: the call is well-formed but not permitted
pub fn invalid_request(message: impl Into<String>) -> McpError {
    McpError::invalid_request(message.into(), None)
}
