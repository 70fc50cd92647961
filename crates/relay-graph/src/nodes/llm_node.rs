use crate::node::{Node, NodeType};
use crate::types::GraphState;
use anyhow::{Context, Result};
use async_trait::async_trait;
use relay_llm::{ChatClient, ChatOptions, ChatRequest, Tool, ToolChoice};
use std::sync::Arc;

pub struct LLMNode {
    client: Arc<dyn ChatClient>,
    tools: Arc<Vec<Tool>>,
    max_tool_rounds: usize,
}

impl LLMNode {
    pub fn new(client: Arc<dyn ChatClient>, tools: Arc<Vec<Tool>>, max_tool_rounds: usize) -> Self {
        Self {
            client,
            tools,
            max_tool_rounds,
        }
    }

    /// The catalog goes out only while the model may still get tool calls
    /// answered; the final round is a plain completion.
    fn build_options(&self, state: &GraphState) -> ChatOptions {
        let mut options = ChatOptions::new();

        if state.tool_rounds < self.max_tool_rounds && !self.tools.is_empty() {
            options = options
                .tools(self.tools.as_ref().clone())
                .tool_choice(ToolChoice::Auto);
        }
        if let Some(temp) = state.llm_config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = state.llm_config.max_tokens {
            options = options.max_tokens(max_tokens);
        }

        options
    }
}

#[async_trait]
impl Node for LLMNode {
    async fn execute(&self, state: &mut GraphState) -> Result<()> {
        let options = self.build_options(state);
        let offered_tools = options.tools.as_ref().map_or(0, |t| t.len());

        tracing::info!(
            run_id = %state.run_id,
            model = %state.llm_config.model,
            round = state.llm_calls + 1,
            tools = offered_tools,
            "requesting completion"
        );

        let request = ChatRequest::new(state.llm_config.model.clone(), state.messages.clone())
            .with_options(options);

        let response = self
            .client
            .chat(request)
            .await
            .with_context(|| format!("LLM call {} failed", state.llm_calls + 1))?;

        state.llm_calls += 1;
        state.record_usage(response.usage);

        tracing::debug!(
            run_id = %state.run_id,
            tool_calls = response.tool_calls.len(),
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            "completion received"
        );

        state.add_message(response.to_message());
        Ok(())
    }

    fn node_type(&self) -> NodeType {
        NodeType::LLM
    }
}
