use crate::types::GraphState;
use anyhow::Result;
use async_trait::async_trait;

/// Core abstraction for a unit of computation in the graph
#[async_trait]
pub trait Node: Send + Sync {
    /// Run the node against the conversation, appending to its history
    async fn execute(&self, state: &mut GraphState) -> Result<()>;

    fn node_type(&self) -> NodeType;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    LLM,
    Tool,
}
