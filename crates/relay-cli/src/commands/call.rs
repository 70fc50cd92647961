//! Call command - invoke one tool directly, no LLM involved.

use anyhow::{Context, Result};
use clap::Args;
use relay_mcp::ToolOutcome;
use serde_json::{Map, Value};
use std::process::ExitCode;

use super::connect;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name
    pub tool: String,

    /// Arguments as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub args: String,
}

pub fn parse_arguments(raw: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(raw).context("--args must be a JSON object")
}

pub async fn execute(config: &Config, tool: &str, arguments: Map<String, Value>) -> Result<ToolOutcome> {
    let client = connect(config).await?;
    Ok(client.call_tool(tool, arguments).await)
}

pub async fn run(args: CallArgs, config: &Config) -> Result<ExitCode> {
    let arguments = parse_arguments(&args.args)?;

    match execute(config, &args.tool, arguments).await? {
        ToolOutcome::Success(Value::String(text)) => {
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        ToolOutcome::Success(value) => {
            println!("{}", value);
            Ok(ExitCode::SUCCESS)
        }
        ToolOutcome::Error(message) => {
            eprintln!("error: {}", message);
            Ok(ExitCode::FAILURE)
        }
    }
}
