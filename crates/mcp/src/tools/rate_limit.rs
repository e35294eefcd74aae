// GitHub rate-limit status

use crate::protocol::{CallToolResult, ToolDescriptor};
use crate::tools::{json_schema_object, Tool};
use anyhow::Result;
use n8n_nodes_client::N8nClient;
use n8n_nodes_core::format;

/// Tool to report the GitHub API rate-limit window
pub struct RateLimitTool {
    client: N8nClient,
}

impl RateLimitTool {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for RateLimitTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "check_rate_limit".to_string(),
            description: "Check GitHub API rate limit status".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let response = self.client.github().rate_limit().await?;

        Ok(CallToolResult::text(format::rate_limit(
            &response.rate,
            self.client.has_token(),
        )))
    }
}
