use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    /// Session could not be established; fatal for the run
    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error ({status}): {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Server answered with a JSON-RPC error object
    #[error("MCP error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, McpError>;
