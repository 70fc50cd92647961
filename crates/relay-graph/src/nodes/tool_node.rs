use crate::node::{Node, NodeType};
use crate::tools::ToolExecutor;
use crate::types::GraphState;
use anyhow::Result;
use async_trait::async_trait;
use relay_mcp::ToolOutcome;
use std::sync::Arc;
use std::time::Instant;

pub struct ToolNode {
    executor: Arc<dyn ToolExecutor>,
}

impl ToolNode {
    pub fn new(executor: Arc<dyn ToolExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Node for ToolNode {
    /// Runs the pending calls one at a time in the order the model listed
    /// them. Each call gets exactly one tool message tagged with its id.
    async fn execute(&self, state: &mut GraphState) -> Result<()> {
        let tool_calls = state.pending_tool_calls().to_vec();

        if tool_calls.is_empty() {
            return Ok(());
        }

        for tool_call in tool_calls {
            let start = Instant::now();

            let outcome = match tool_call.arguments_map() {
                Ok(arguments) => self.executor.execute(tool_call.name(), arguments).await,
                Err(e) => {
                    tracing::warn!(
                        tool = tool_call.name(),
                        arguments = %tool_call.function.arguments,
                        error = %e,
                        "tool arguments are not a JSON object"
                    );
                    ToolOutcome::Error(format!("Invalid arguments for {}: {}", tool_call.name(), e))
                }
            };

            tracing::info!(
                run_id = %state.run_id,
                tool = tool_call.name(),
                tool_call_id = %tool_call.id,
                is_error = outcome.is_error(),
                duration_ms = start.elapsed().as_millis() as u64,
                "tool call finished"
            );

            state.add_tool_result(tool_call.id, &outcome);
        }

        state.tool_rounds += 1;
        Ok(())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Tool
    }
}
