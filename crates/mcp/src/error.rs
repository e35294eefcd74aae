// Errors raised by the MCP layer itself, as opposed to tool failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    /// Requested tool name is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with this name is already registered
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// Arguments were not a JSON object
    #[error("Arguments for tool '{tool}' must be a JSON object")]
    ArgumentsNotObject { tool: String },

    /// A required argument was absent or null
    #[error("Missing required argument '{argument}' for tool '{tool}'")]
    MissingArgument { tool: String, argument: String },
}
