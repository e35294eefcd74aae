pub mod community;
pub mod nodes;
pub mod rate_limit;
mod registry;

pub use community::CommunityNodesTool;
pub use nodes::{ListNodesTool, NodeDetailsTool, NodeSnippetTool, SearchNodesTool};
pub use rate_limit::RateLimitTool;
pub use registry::{json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry};

use crate::error::McpError;
use n8n_nodes_client::N8nClient;
use std::sync::Arc;

/// Registry holding every n8n node tool, in the order they are advertised
pub fn default_registry(client: &N8nClient) -> Result<ToolRegistry, McpError> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(ListNodesTool::new(client.clone())),
        Arc::new(NodeDetailsTool::new(client.clone())),
        Arc::new(SearchNodesTool::new(client.clone())),
        Arc::new(NodeSnippetTool::new(client.clone())),
        Arc::new(CommunityNodesTool::new(client.clone())),
        Arc::new(RateLimitTool::new(client.clone())),
    ];

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool)?;
    }
    Ok(registry)
}
