// Node catalog tools backed by the n8n GitHub repository

use crate::protocol::{CallToolResult, ToolDescriptor};
use crate::tools::{json_schema_number, json_schema_object, json_schema_string, Tool};
use anyhow::{bail, Context, Result};
use n8n_nodes_client::N8nClient;
use n8n_nodes_core::extract::{is_valid_node_name, NodeInfo};
use n8n_nodes_core::format;
use serde::Deserialize;

const DEFAULT_SNIPPET_LINES: u64 = 50;

fn validated_node_name(name: &str) -> Result<&str> {
    if !is_valid_node_name(name) {
        bail!("Invalid node name '{}'", name);
    }
    Ok(name)
}

/// Tool to list every node in the catalog
pub struct ListNodesTool {
    client: N8nClient,
}

impl ListNodesTool {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListNodesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "list_all_nodes".to_string(),
            description: "List all N8N nodes from their GitHub repository".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        let listing = self.client.catalog().list_nodes().await?;
        let preview = self.client.config().catalog.preview_limit;

        Ok(CallToolResult::text(format::node_listing(&listing, preview)))
    }
}

#[derive(Debug, Deserialize)]
struct SearchNodesArgs {
    keyword: String,
}

/// Tool to search node names by keyword
pub struct SearchNodesTool {
    client: N8nClient,
}

impl SearchNodesTool {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for SearchNodesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "search_nodes".to_string(),
            description: "Search for N8N nodes containing a keyword".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "keyword": json_schema_string("Keyword to search for")
                }),
                vec!["keyword"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchNodesArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for search_nodes")?;

        let listing = self.client.catalog().list_nodes().await?;
        let matches = listing.search(&args.keyword);

        Ok(CallToolResult::text(format::search_results(&args.keyword, &matches)))
    }
}

#[derive(Debug, Deserialize)]
struct NodeDetailsArgs {
    node_name: String,
}

/// Tool to summarize a single node from its source file
pub struct NodeDetailsTool {
    client: N8nClient,
}

impl NodeDetailsTool {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for NodeDetailsTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_node_details".to_string(),
            description: "Get details about a specific N8N node".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "node_name": json_schema_string("Name of the N8N node")
                }),
                vec!["node_name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NodeDetailsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_node_details")?;
        let name = validated_node_name(&args.node_name)?;

        match self.client.catalog().find_node_file(name).await? {
            Some(file) => {
                let info = NodeInfo::from_file(&file);
                let json = serde_json::to_string_pretty(&info)?;
                Ok(CallToolResult::text(json))
            }
            None => Ok(CallToolResult::text(format::node_not_found(name))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NodeSnippetArgs {
    node_name: String,
    #[serde(default)]
    lines: Option<f64>,
}

/// Line counts arrive as JSON numbers, so `10.0` is accepted but `2.5` is not.
fn line_count(lines: Option<f64>) -> Result<usize> {
    let Some(lines) = lines else {
        return Ok(DEFAULT_SNIPPET_LINES as usize);
    };
    if !lines.is_finite() || lines < 0.0 || lines.fract() != 0.0 || lines > u32::MAX as f64 {
        bail!("'lines' must be a non-negative integer, got {}", lines);
    }
    Ok(lines as usize)
}

/// Tool to return the first lines of a node's source file
pub struct NodeSnippetTool {
    client: N8nClient,
}

impl NodeSnippetTool {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for NodeSnippetTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_node_code_snippet".to_string(),
            description: "Get the first N lines of a node's source code".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "node_name": json_schema_string("Name of the N8N node"),
                    "lines": json_schema_number("Number of lines to retrieve", Some(DEFAULT_SNIPPET_LINES))
                }),
                vec!["node_name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NodeSnippetArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_node_code_snippet")?;
        let name = validated_node_name(&args.node_name)?;
        let lines = line_count(args.lines)?;

        match self.client.catalog().find_node_file(name).await? {
            Some(file) => Ok(CallToolResult::text(format::code_snippet(
                name,
                lines,
                &file.content,
            ))),
            None => Ok(CallToolResult::text(format::code_not_found(name))),
        }
    }
}
