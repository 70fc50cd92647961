use crate::types::config::LLMConfig;
use relay_llm::{Message, TokenUsage, ToolCall};
use relay_mcp::ToolOutcome;

#[derive(Debug, Clone)]
pub struct GraphState {
    pub run_id: String,
    pub messages: Vec<Message>,
    pub llm_config: LLMConfig,
    /// Completed tool rounds
    pub tool_rounds: usize,
    pub llm_calls: usize,
    pub usage: Option<TokenUsage>,
}

impl GraphState {
    pub fn from_input(input: GraphInput) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            messages: input.messages,
            llm_config: input.llm_config,
            tool_rounds: 0,
            llm_calls: 0,
            usage: None,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Tool calls on the trailing assistant message, if it asked for any
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        match self.last_message() {
            Some(message @ Message::Assistant { .. }) => message.tool_calls(),
            _ => &[],
        }
    }

    pub fn has_pending_tool_calls(&self) -> bool {
        !self.pending_tool_calls().is_empty()
    }

    /// Sum token usage across LLM calls
    pub fn record_usage(&mut self, usage: Option<TokenUsage>) {
        let Some(usage) = usage else { return };
        self.usage = Some(match self.usage {
            Some(total) => TokenUsage {
                input_tokens: total.input_tokens + usage.input_tokens,
                output_tokens: total.output_tokens + usage.output_tokens,
                total_tokens: total.total_tokens + usage.total_tokens,
            },
            None => usage,
        });
    }

    pub fn add_tool_result(&mut self, tool_call_id: impl Into<String>, outcome: &ToolOutcome) {
        self.messages
            .push(Message::tool_result(tool_call_id, outcome.to_message_content()));
    }
}

/// What a run starts from: the opening messages and the model settings.
#[derive(Debug, Clone)]
pub struct GraphInput {
    pub messages: Vec<Message>,
    pub llm_config: LLMConfig,
}

impl GraphInput {
    /// Single user prompt, preceded by the configured system prompt if any
    pub fn new(prompt: impl Into<String>, llm_config: LLMConfig) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &llm_config.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(prompt));
        Self { messages, llm_config }
    }

    pub fn from_messages(messages: Vec<Message>, llm_config: LLMConfig) -> Self {
        Self { messages, llm_config }
    }
}
