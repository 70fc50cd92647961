use config::{Config as ConfigLoader, ConfigError, Environment, File};
use relay_graph::{GraphConfig, LLMConfig};
use relay_llm::OpenAIConfig;
use relay_mcp::{ClientInfo, PROTOCOL_VERSION};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    pub endpoint: String,
    pub client_name: String,
    pub client_title: Option<String>,
    pub client_version: String,
    pub protocol_version: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/mcp".to_string(),
            client_name: "relay".to_string(),
            client_title: None,
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}

impl McpConfig {
    pub fn client_info(&self) -> ClientInfo {
        let info = ClientInfo::new(&self.client_name, &self.client_version)
            .with_protocol_version(&self.protocol_version);
        match &self.client_title {
            Some(title) => info.with_title(title),
            None => info,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    /// OpenAI-compatible API root; the public API when unset
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let defaults = LLMConfig::default();
        Self {
            model: defaults.model,
            base_url: None,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            system_prompt: defaults.system_prompt,
        }
    }
}

impl From<&LlmConfig> for LLMConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. `path`, if given (must exist)
    /// 3. Environment variables, `RELAY_MCP__ENDPOINT=...` style
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let mut cfg: Config = builder
            .add_source(
                Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(cfg)
    }

    /// Only the subcommands that talk to the LLM need the key
    pub fn openai(&self) -> Result<OpenAIConfig, ConfigError> {
        let api_key = self.openai_api_key.clone().ok_or_else(|| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;

        let openai = OpenAIConfig::new(api_key);
        Ok(match &self.llm.base_url {
            Some(base_url) => openai.with_base_url(base_url),
            None => openai,
        })
    }
}
