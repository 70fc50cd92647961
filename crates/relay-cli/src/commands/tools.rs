//! Tools command - list what the MCP server offers.

use anyhow::Result;
use clap::Args;
use relay_mcp::McpTool;
use std::process::ExitCode;

use super::connect;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Print the raw descriptors as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(config: &Config) -> Result<Vec<McpTool>> {
    let client = connect(config).await?;
    Ok(client.list_tools().await?)
}

pub async fn run(args: ToolsArgs, config: &Config) -> Result<ExitCode> {
    let tools = execute(config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
    } else {
        for tool in &tools {
            println!("{} : {}", tool.name, tool.description.as_deref().unwrap_or_default());
        }
    }

    Ok(ExitCode::SUCCESS)
}
