// Client construction from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Connection settings for the OpenAI chat-completions API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: OpenAIConfig) -> Result<Arc<dyn crate::traits::ChatClient>> {
        let mut client = crate::openai::OpenAIClient::new(config.api_key)?;
        if let Some(base_url) = config.base_url {
            client = client.with_base_url(base_url);
        }
        Ok(Arc::new(client))
    }
}
