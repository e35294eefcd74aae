// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use n8n_nodes_client::N8nClient;
use n8n_nodes_core::Config;
use n8n_nodes_mcp::server::McpServer;
use n8n_nodes_mcp::tools::default_registry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "n8n-nodes-mcp")]
#[command(about = "MCP server for browsing n8n nodes over stdio", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "n8n-nodes.toml")]
    config: PathBuf,

    /// GitHub token for authenticated requests (5000 req/hour instead of 60)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "n8n_nodes=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?
        .with_github_token(args.github_token);

    if !config.has_token() {
        tracing::info!("No GITHUB_TOKEN set; GitHub requests are limited to 60 per hour");
    }

    let client = N8nClient::new(config)?;
    let registry = default_registry(&client)?;
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    tracing::info!("N8N Node MCP Server running on stdio");
    server.start().await?;

    Ok(())
}
