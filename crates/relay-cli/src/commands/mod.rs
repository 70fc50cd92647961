pub mod ask;
pub mod call;
pub mod tools;

use anyhow::{Context, Result};
use relay_mcp::McpClient;

use crate::config::Config;

/// Handshake with the configured MCP server. Failure here ends the command.
pub async fn connect(config: &Config) -> Result<McpClient> {
    tracing::debug!(endpoint = %config.mcp.endpoint, "connecting to MCP server");
    McpClient::connect(&config.mcp.endpoint, &config.mcp.client_info())
        .await
        .with_context(|| format!("MCP handshake with {} failed", config.mcp.endpoint))
}
