// MCP (Model Context Protocol) server exposing n8n node information
// to agent clients over stdio

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::McpError;
pub use server::McpServer;
