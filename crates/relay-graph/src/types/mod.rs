pub mod config;
pub mod output;
pub mod state;

pub use config::{GraphConfig, LLMConfig};
pub use output::RunOutput;
pub use state::{GraphInput, GraphState};
