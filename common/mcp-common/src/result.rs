//! Result helpers for MCP tool responses

use rmcp::model::{CallToolResult, Content};

/// Successful plain text response
///
/// ```rust,ignore
/// Ok(text_success(format!("Repository status:\n{}", status)))
/// ```
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Successful text response built from a header line and a list of entries
///
/// Entries are joined with newlines; an empty list yields just the header
/// and its newline.
pub fn listing_success(header: &str, entries: &[String]) -> CallToolResult {
    text_success(format!("{}\n{}", header, entries.join("\n")))
}
