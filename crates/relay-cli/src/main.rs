//! relay - talk to an LLM that can call tools on an MCP server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay_cli::commands::{ask, call, tools};
use relay_cli::config::{Config, LoggingConfig};

#[derive(Parser)]
#[command(name = "relay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Extra TOML config layered over config/default.toml
    #[arg(short, long, global = true, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// MCP endpoint, overrides [mcp] endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question; the model may call the server's tools
    Ask(ask::AskArgs),

    /// List the server's tools
    Tools(tools::ToolsArgs),

    /// Call one tool directly
    Call(call::CallArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(endpoint) = cli.endpoint {
        config.mcp.endpoint = endpoint;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Ask(args) => ask::run(args, &config).await,
        Commands::Tools(args) => tools::run(args, &config).await,
        Commands::Call(args) => call::run(args, &config).await,
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}
