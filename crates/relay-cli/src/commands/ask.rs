//! Ask command - one question, answered with the server's tools available.

use anyhow::{Context, Result};
use clap::Args;
use relay_graph::{Graph, GraphInput, LLMConfig, RunOutput};
use relay_llm::{ChatClient, ClientFactory};
use std::process::ExitCode;
use std::sync::Arc;

use super::connect;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question or prompt to send
    #[arg(required = true)]
    pub prompt: String,

    /// Override the configured model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override how many tool rounds the model gets
    #[arg(long)]
    pub max_tool_rounds: Option<usize>,

    /// Print the whole conversation as JSON lines after the answer
    #[arg(long)]
    pub history: bool,
}

/// Handshake, list tools, run the orchestrator.
pub async fn execute(config: &Config, llm_client: Arc<dyn ChatClient>, prompt: &str) -> Result<RunOutput> {
    let mcp = connect(config).await?;

    let graph = Graph::builder()
        .llm_client(llm_client)
        .executor(Arc::new(mcp))
        .config(config.graph.clone())
        .build()?;

    graph.run(GraphInput::new(prompt, LLMConfig::from(&config.llm))).await
}

pub async fn run(args: AskArgs, config: &Config) -> Result<ExitCode> {
    let mut config = config.clone();
    if let Some(model) = args.model {
        config.llm.model = model;
    }
    if let Some(rounds) = args.max_tool_rounds {
        config.graph.max_tool_rounds = rounds;
    }

    let llm_client = ClientFactory::create_chat_client(config.openai()?)
        .context("Failed to create LLM client")?;

    let output = execute(&config, llm_client, &args.prompt).await?;

    println!("{}", output.answer);

    if output.is_truncated() {
        let names: Vec<&str> = output.unanswered_tool_calls.iter().map(|c| c.name()).collect();
        eprintln!(
            "note: stopped after {} tool round(s); unanswered calls: {}",
            output.tool_rounds,
            names.join(", ")
        );
    }

    if args.history {
        for message in &output.messages {
            println!("{}", serde_json::to_string(message)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
