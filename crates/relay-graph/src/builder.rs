use anyhow::{anyhow, Result};
use relay_llm::ChatClient;
use std::sync::Arc;

use crate::graph::Graph;
use crate::tools::ToolExecutor;
use crate::types::GraphConfig;

/// Builder for constructing a Graph
pub struct GraphBuilder {
    llm_client: Option<Arc<dyn ChatClient>>,
    executor: Option<Arc<dyn ToolExecutor>>,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            executor: None,
            config: GraphConfig::default(),
        }
    }

    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    /// Set the tool executor, usually an MCP client
    pub fn executor(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.config.max_tool_rounds = rounds;
        self
    }

    pub fn build(self) -> Result<Graph> {
        let llm_client = self
            .llm_client
            .ok_or_else(|| anyhow!("LLM client is required"))?;
        let executor = self
            .executor
            .ok_or_else(|| anyhow!("Tool executor is required"))?;

        Ok(Graph::new(llm_client, executor, self.config))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
