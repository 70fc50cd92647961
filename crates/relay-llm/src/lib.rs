pub mod types;
pub mod traits;
pub mod config;
pub mod openai;

pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
pub use config::{ClientFactory, OpenAIConfig};
pub use openai::OpenAIClient;
pub use types::{FunctionCall, FunctionDefinition, Message, Tool, ToolCall, ToolChoice};
