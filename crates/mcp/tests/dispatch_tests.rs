//! Integration tests for the MCP server
//!
//! These drive the full stack (JSON-RPC framing, dispatcher, tools, HTTP
//! client) against mocked GitHub and npm endpoints.

use n8n_nodes_client::N8nClient;
use n8n_nodes_core::Config;
use n8n_nodes_mcp::protocol::CallToolParams;
use n8n_nodes_mcp::tools::default_registry;
use n8n_nodes_mcp::McpServer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NODES_BASE: &str = "/repos/n8n-io/n8n/contents/packages/nodes-base/nodes";

fn server_with(config: Config) -> McpServer {
    let client = N8nClient::new(config).unwrap();
    McpServer::new(default_registry(&client).unwrap())
}

/// Default configuration pointed at a single mock for every upstream.
fn mocked_config(mock: &MockServer) -> Config {
    let mut config = Config::default();
    config.github.api_base = mock.uri();
    config.github.raw_base = mock.uri();
    config.npm.registry = mock.uri();
    config
}

fn call(name: &str, arguments: Value) -> CallToolParams {
    CallToolParams {
        name: name.to_string(),
        arguments,
    }
}

fn dirs(names: &[&str]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|n| json!({"name": n, "type": "dir"}))
            .collect(),
    )
}

/// Test tool listing is stable and complete
#[tokio::test]
async fn test_tools_list_names_unique_and_ordered() {
    let server = server_with(Config::default());

    let first = server.list_tools();
    let second = server.list_tools();

    let names: Vec<&str> = first.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "list_all_nodes",
            "get_node_details",
            "search_nodes",
            "get_node_code_snippet",
            "list_community_nodes",
            "check_rate_limit",
        ]
    );
    assert_eq!(first.tools, second.tools);
}

#[tokio::test]
async fn test_unknown_tool_returns_error_result() {
    let server = server_with(Config::default());

    let result = server.call_tool(call("does_not_exist", json!({}))).await;

    assert!(result.is_error());
    assert_eq!(result.joined_text(), "Error: Unknown tool: does_not_exist");
}

#[tokio::test]
async fn test_missing_required_argument_makes_no_requests() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));

    for tool in ["get_node_details", "search_nodes", "get_node_code_snippet"] {
        let result = server.call_tool(call(tool, json!({}))).await;
        assert!(result.is_error(), "{tool} should reject missing arguments");
        assert!(result.joined_text().starts_with("Error: Missing required argument"));
    }
}

#[tokio::test]
async fn test_network_failure_is_error_result() {
    let mut config = Config::default();
    config.github.api_base = "http://127.0.0.1:1".to_string();
    config.http.timeout_secs = 5;
    let server = server_with(config);

    let result = server.call_tool(call("list_all_nodes", json!({}))).await;

    assert!(result.is_error());
    assert!(
        result.joined_text().starts_with("Error: request to"),
        "unexpected text: {}",
        result.joined_text()
    );
}

/// Test primary source listing with a failing secondary source
#[tokio::test]
async fn test_listing_survives_failing_secondary_source() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NODES_BASE))
        .respond_with(ResponseTemplate::new(200).set_body_json(dirs(&["Airtable", "Slack"])))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/repos/n8n-io/n8n/contents/packages/@n8n/.*"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let result = server.call_tool(call("list_all_nodes", json!({}))).await;

    assert!(!result.is_error());
    assert_eq!(
        result.joined_text(),
        "Found 2 N8N nodes (2 from nodes-base, 0 from langchain):\n\nAirtable\nSlack"
    );
}

#[tokio::test]
async fn test_listing_includes_secondary_categories() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NODES_BASE))
        .respond_with(ResponseTemplate::new(200).set_body_json(dirs(&["Slack"])))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/n8n-io/n8n/contents/packages/@n8n/nodes-langchain/nodes/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dirs(&["Agent"])))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let result = server.call_tool(call("list_all_nodes", json!({}))).await;

    assert_eq!(
        result.joined_text(),
        "Found 2 N8N nodes (1 from nodes-base, 1 from langchain):\n\nSlack\nAgent"
    );
}

#[tokio::test]
async fn test_listing_truncates_preview() {
    let mock = MockServer::start().await;
    let names: Vec<String> = (0..60).map(|i| format!("Node{i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    Mock::given(method("GET"))
        .and(path(NODES_BASE))
        .respond_with(ResponseTemplate::new(200).set_body_json(dirs(&refs)))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let text = server
        .call_tool(call("list_all_nodes", json!({})))
        .await
        .joined_text();

    assert!(text.starts_with("Found 60 N8N nodes (60 from nodes-base, 0 from langchain):"));
    assert!(text.contains("Node49"));
    assert!(!text.contains("Node50"));
    assert!(text.ends_with("... and 10 more nodes."));
}

#[tokio::test]
async fn test_identical_upstream_gives_identical_text() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NODES_BASE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "A", "type": "dir"},
            {"name": "README.md", "type": "file"}
        ])))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let first = server.call_tool(call("list_all_nodes", json!({}))).await;
    let second = server.call_tool(call("list_all_nodes", json!({}))).await;

    assert_eq!(first, second);
    assert!(first.joined_text().ends_with("\n\nA"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NODES_BASE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(dirs(&["HTTPRequest", "Slack", "HttpBin"])),
        )
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let result = server
        .call_tool(call("search_nodes", json!({"keyword": "http"})))
        .await;

    assert_eq!(
        result.joined_text(),
        "Found 2 nodes containing 'http':\n\nHTTPRequest\nHttpBin"
    );
}

#[tokio::test]
async fn test_node_lookup_falls_back_to_secondary_source() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/n8n-io/n8n/master/packages/@n8n/nodes-langchain/nodes/agents/Agent/Agent.node.ts",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "displayName: 'AI Agent',\ndescription: 'Generates an action plan',\n",
        ))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let result = server
        .call_tool(call("get_node_details", json!({"node_name": "Agent"})))
        .await;

    assert!(!result.is_error());
    let info: Value = serde_json::from_str(&result.joined_text()).unwrap();
    assert_eq!(info["source"], "langchain");
    assert_eq!(info["display_name"], "AI Agent");
    assert_eq!(info["has_credentials"], false);
}

#[tokio::test]
async fn test_node_not_found_is_success_text() {
    let mock = MockServer::start().await;
    let server = server_with(mocked_config(&mock));

    let details = server
        .call_tool(call("get_node_details", json!({"node_name": "Ghost"})))
        .await;
    assert!(!details.is_error());
    assert!(details.joined_text().contains("Ghost"));

    let snippet = server
        .call_tool(call("get_node_code_snippet", json!({"node_name": "Ghost", "lines": 5})))
        .await;
    assert!(!snippet.is_error());
    assert_eq!(snippet.joined_text(), "Could not fetch code for 'Ghost'");
}

#[tokio::test]
async fn test_community_nodes() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                {"package": {"name": "n8n-nodes-a", "version": "0.2.0", "description": "First"}},
                {"package": {"name": "n8n-nodes-b"}}
            ]
        })))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let result = server
        .call_tool(call("list_community_nodes", json!({})))
        .await;

    assert_eq!(
        result.joined_text(),
        "Community N8N Nodes on npm:\n\n- n8n-nodes-a (v0.2.0): First\n- n8n-nodes-b (v?): No description"
    );
}

#[tokio::test]
async fn test_rate_limit_without_token() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rate": {"limit": 60, "remaining": 0, "reset": 0}
        })))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let text = server
        .call_tool(call("check_rate_limit", json!({})))
        .await
        .joined_text();

    assert!(text.contains("- Remaining: 0 requests"));
    assert!(text.contains("- Resets at: 0 (Unix timestamp, 1970-01-01T00:00:00+00:00)"));
    assert!(text.contains("No (60 req/hour limit)"));
}

/// Test a full stdio session over in-memory pipes
#[tokio::test]
async fn test_stdio_session() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NODES_BASE))
        .respond_with(ResponseTemplate::new(200).set_body_json(dirs(&["Slack"])))
        .mount(&mock)
        .await;

    let server = server_with(mocked_config(&mock));
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"it","version":"0"}}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"search_nodes","arguments":{"keyword":"sla"}}}"#,
    ]
    .join("\n");
    let mut output = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3, "notification must not be answered");
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "n8n-nodes");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 6);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Found 1 nodes containing 'sla':\n\nSlack"
    );
    assert!(responses[2]["result"].get("isError").is_none());
}
