//! MCP client over the streamable-HTTP transport.
//!
//! The flow is: [`session::initialize`] produces an immutable [`Session`],
//! which is then passed to [`catalog::list_tools`] and [`bridge::invoke`].
//! [`McpClient`] bundles a transport and a session for callers that do not
//! need the pieces separately.

pub mod bridge;
pub mod catalog;
pub mod client;
pub mod error;
pub mod jsonrpc;
pub mod session;
pub mod sse;
pub mod transport;

pub use bridge::ToolOutcome;
pub use catalog::{to_llm_tool, to_llm_tools, McpTool};
pub use client::McpClient;
pub use error::{McpError, Result};
pub use session::{ClientInfo, ServerInfo, Session};
pub use transport::{McpReply, McpTransport};

/// Protocol revision sent in `initialize`
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Response header carrying the server-assigned session id
pub const SESSION_HEADER: &str = "mcp-session-id";

pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// `Accept` value required on every request
pub const ACCEPT_VALUE: &str = "application/json, text/event-stream";
