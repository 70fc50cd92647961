use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use relay_mcp::jsonrpc::{JsonRpcResponse, RequestId, INVALID_PARAMS, INVALID_REQUEST};
use thiserror::Error;

/// Failures answered at the HTTP level, before any method is dispatched.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad Request: Missing session ID")]
    MissingSession,

    #[error("Session not found")]
    UnknownSession(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::MissingSession => StatusCode::BAD_REQUEST,
            ServerError::UnknownSession(ref id) => {
                tracing::warn!(session_id = %id, "request for unknown session");
                StatusCode::NOT_FOUND
            }
            ServerError::Json(ref e) => {
                tracing::error!("Serialization error: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let body = JsonRpcResponse::failure(
            Some(RequestId::String("server-error".to_string())),
            INVALID_REQUEST,
            self.to_string(),
        );
        let body = serde_json::to_string(&body).unwrap_or_default();

        (status, [(CONTENT_TYPE, "application/json")], body).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A `tools/call` the demo tools refuse; sent back as a JSON-RPC error.
#[derive(Debug, Error, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

impl ToolError {
    pub fn code(&self) -> i64 {
        INVALID_PARAMS
    }
}
