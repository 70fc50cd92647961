use crate::node::{Node, NodeType};
use crate::nodes::{LLMNode, ToolNode};
use crate::router::{NextNode, Router, SimpleRouter};
use crate::tools::ToolExecutor;
use crate::types::{GraphConfig, GraphInput, GraphState, RunOutput};
use anyhow::Result;
use relay_llm::{ChatClient, Tool};
use std::sync::Arc;
use std::time::Instant;

/// Conversation orchestrator.
///
/// Asks the model with the tool catalog attached, runs whatever tools it
/// requests, feeds the results back and asks again, until the model answers
/// without tools or the configured number of tool rounds is used up.
pub struct Graph {
    llm_client: Arc<dyn ChatClient>,
    executor: Arc<dyn ToolExecutor>,
    config: GraphConfig,
}

impl Graph {
    pub fn new(llm_client: Arc<dyn ChatClient>, executor: Arc<dyn ToolExecutor>, config: GraphConfig) -> Self {
        Self {
            llm_client,
            executor,
            config,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::GraphBuilder {
        crate::builder::GraphBuilder::new()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Fetch the catalog from the executor, then run.
    ///
    /// A failed catalog fetch does not end the run: the model is asked
    /// without tools instead.
    pub async fn run(&self, input: GraphInput) -> Result<RunOutput> {
        let tools = if self.config.max_tool_rounds > 0 {
            match self.executor.list_tools().await {
                Ok(tools) => tools,
                Err(e) => {
                    tracing::warn!(error = %format!("{:#}", e), "tool catalog unavailable, continuing without tools");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        self.run_with_tools(input, tools).await
    }

    /// Run with a catalog the caller already holds.
    pub async fn run_with_tools(&self, input: GraphInput, tools: Vec<Tool>) -> Result<RunOutput> {
        let start_time = Instant::now();
        let mut state = GraphState::from_input(input);

        tracing::info!(
            run_id = %state.run_id,
            tools = tools.len(),
            max_tool_rounds = self.config.max_tool_rounds,
            "starting run"
        );

        let llm_node = LLMNode::new(
            Arc::clone(&self.llm_client),
            Arc::new(tools),
            self.config.max_tool_rounds,
        );
        let tool_node = ToolNode::new(Arc::clone(&self.executor));
        let router = SimpleRouter::new(self.config.max_tool_rounds);

        let mut current_node = NodeType::LLM;

        // Bounded: every Tool step bumps tool_rounds and the router stops at the limit
        loop {
            match current_node {
                NodeType::LLM => llm_node.execute(&mut state).await?,
                NodeType::Tool => tool_node.execute(&mut state).await?,
            }

            match router.next(&state, current_node) {
                NextNode::End => break,
                NextNode::LLM => current_node = NodeType::LLM,
                NextNode::Tool => current_node = NodeType::Tool,
            }
        }

        let unanswered_tool_calls = state.pending_tool_calls().to_vec();
        if !unanswered_tool_calls.is_empty() {
            tracing::warn!(
                run_id = %state.run_id,
                max_tool_rounds = self.config.max_tool_rounds,
                unanswered = unanswered_tool_calls.len(),
                "tool round limit reached, returning without running requested tools"
            );
        }

        let answer = state
            .last_message()
            .and_then(|m| m.text())
            .unwrap_or_default()
            .to_string();

        tracing::info!(
            run_id = %state.run_id,
            llm_calls = state.llm_calls,
            tool_rounds = state.tool_rounds,
            total_duration_ms = start_time.elapsed().as_millis() as u64,
            "run finished"
        );

        Ok(RunOutput {
            run_id: state.run_id,
            answer,
            messages: state.messages,
            tool_rounds: state.tool_rounds,
            llm_calls: state.llm_calls,
            unanswered_tool_calls,
            usage: state.usage,
        })
    }
}
