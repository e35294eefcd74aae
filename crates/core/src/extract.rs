// Heuristic metadata extraction from a node's TypeScript source

use crate::types::NodeFile;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static DISPLAY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"displayName:\s*['"]([^'"]+)['"]"#).expect("valid regex"));

static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"description:\s*['"]([^'"]+)['"]"#).expect("valid regex"));

static NODE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("valid regex"));

/// Summary of a node, rendered as pretty JSON by `get_node_details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub source: String,
    pub has_credentials: bool,
    pub is_trigger: bool,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeInfo {
    pub fn from_file(file: &NodeFile) -> Self {
        let content = &file.content;
        let credentials_file = format!("{}Api.credentials.ts", file.name);

        Self {
            name: file.name.clone(),
            source: file.source.clone(),
            has_credentials: content.contains(&credentials_file) || content.contains("credentials:"),
            is_trigger: content.contains("ITriggerNode") || content.contains("IWebhookNode"),
            file_url: file.url.clone(),
            display_name: first_capture(&DISPLAY_NAME, content),
            description: first_capture(&DESCRIPTION, content),
        }
    }
}

fn first_capture(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Node names become URL path segments, so anything that could walk out of
/// the node's directory is refused.
pub fn is_valid_node_name(name: &str) -> bool {
    NODE_NAME.is_match(name) && !name.contains("..")
}
