// Tool trait and the ordered registry of callable tools

use crate::error::McpError;
use crate::protocol::{CallToolResult, ToolDescriptor};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool descriptor for MCP
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool with given arguments.
    ///
    /// Expected absence upstream is an `Ok` result with explanatory text;
    /// anything unexpected is an `Err` and becomes an error response.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    tool: Arc<dyn Tool>,
}

/// Tool registry, fixed once the server starts.
///
/// Tools are listed in registration order and resolved by exact,
/// case-sensitive name.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), McpError> {
        let descriptor = tool.descriptor();
        if self.by_name.contains_key(&descriptor.name) {
            return Err(McpError::DuplicateTool(descriptor.name));
        }

        self.by_name.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool { descriptor, tool });
        Ok(())
    }

    /// Get a tool together with the descriptor it was registered with
    pub fn resolve(&self, name: &str) -> Result<(&ToolDescriptor, Arc<dyn Tool>), McpError> {
        self.by_name
            .get(name)
            .map(|&index| {
                let entry = &self.tools[index];
                (&entry.descriptor, entry.tool.clone())
            })
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))
    }

    /// List all tool descriptors in registration order
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str, default: Option<u64>) -> serde_json::Value {
    let mut schema = serde_json::json!({
        "type": "number",
        "description": description
    });
    if let Some(default) = default {
        schema["default"] = default.into();
    }
    schema
}
