use relay_llm::{Message, TokenUsage, ToolCall};

/// Result of one orchestrator run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub run_id: String,
    /// Text of the last completion; empty when the model returned none
    pub answer: String,
    /// Full conversation, including tool-call and tool-result messages
    pub messages: Vec<Message>,
    pub tool_rounds: usize,
    pub llm_calls: usize,
    /// Calls the model asked for after the round limit was reached
    pub unanswered_tool_calls: Vec<ToolCall>,
    pub usage: Option<TokenUsage>,
}

impl RunOutput {
    pub fn is_truncated(&self) -> bool {
        !self.unanswered_tool_calls.is_empty()
    }
}
