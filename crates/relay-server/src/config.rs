use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route the MCP endpoint is mounted on
    pub path: String,
    /// Reported as `serverInfo.name`
    pub name: String,
    pub version: String,
    pub result_shape: ResultShape,
    /// Frozen clock for `current_time` (`YYYY-MM-DD HH:MM`); local time when unset
    pub fixed_time: Option<String>,
    /// Sessions kept at once; the oldest is dropped to make room
    pub max_sessions: usize,
    /// Sessions older than this are dropped when a new one opens
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            path: "/mcp".to_string(),
            name: "relay_demo".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            result_shape: ResultShape::default(),
            fixed_time: None,
            max_sessions: 1024,
            session_ttl_secs: 3600,
        }
    }
}

impl ServerConfig {
    pub fn with_result_shape(mut self, shape: ResultShape) -> Self {
        self.result_shape = shape;
        self
    }

    pub fn with_fixed_time(mut self, time: impl Into<String>) -> Self {
        self.fixed_time = Some(time.into());
        self
    }

    pub fn with_session_limits(mut self, max_sessions: usize, ttl_secs: u64) -> Self {
        self.max_sessions = max_sessions;
        self.session_ttl_secs = ttl_secs;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where a `tools/call` result puts the tool's return value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultShape {
    /// `result.structuredContent.result`
    #[default]
    Structured,
    /// `result.result`, as older servers answered
    Legacy,
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
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/server.toml
    /// 2. `path`, if given
    /// 3. Environment variables, `RELAY_SERVER__PORT=9000` style
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/server").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load config from a specific file only (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}
