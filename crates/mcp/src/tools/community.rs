// Community node packages published on npm

use crate::protocol::{CallToolResult, ToolDescriptor};
use crate::tools::{json_schema_object, Tool};
use anyhow::Result;
use n8n_nodes_client::N8nClient;
use n8n_nodes_core::format;

/// Tool to list community node packages from the npm registry
pub struct CommunityNodesTool {
    client: N8nClient,
}

impl CommunityNodesTool {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CommunityNodesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "list_community_nodes".to_string(),
            description: "List community N8N nodes from npm".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let response = self.client.npm().community_packages().await?;
        let search_text = &self.client.config().npm.search_text;

        Ok(CallToolResult::text(format::community_nodes(search_text, &response)))
    }
}
