use anyhow::{Context, Result};
use async_trait::async_trait;
use relay_llm::Tool;
use relay_mcp::{McpClient, ToolOutcome};
use serde_json::{Map, Value};

/// Where the orchestrator gets its catalog and runs tool calls.
///
/// `execute` never fails: transport and tool errors come back as
/// [`ToolOutcome::Error`] so the model can read them.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Catalog in function-calling form
    async fn list_tools(&self) -> Result<Vec<Tool>>;

    async fn execute(&self, tool_name: &str, arguments: Map<String, Value>) -> ToolOutcome;
}

#[async_trait]
impl ToolExecutor for McpClient {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        self.llm_tools().await.context("Failed to list MCP tools")
    }

    async fn execute(&self, tool_name: &str, arguments: Map<String, Value>) -> ToolOutcome {
        self.call_tool(tool_name, arguments).await
    }
}
