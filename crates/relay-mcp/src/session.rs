use crate::error::{McpError, Result};
use crate::jsonrpc::{JsonRpcRequest, RequestId, ResponsePayload};
use crate::transport::{McpReply, McpTransport};
use crate::{ACCEPT_VALUE, PROTOCOL_VERSION, PROTOCOL_VERSION_HEADER, SESSION_HEADER};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

/// Identity and protocol revision announced in `initialize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub version: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

fn default_protocol_version() -> String {
    PROTOCOL_VERSION.to_string()
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::new("relay", env!("CARGO_PKG_VERSION"))
    }
}

impl ClientInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            version: version.into(),
            protocol_version: default_protocol_version(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    fn initialize_params(&self) -> Value {
        let mut client_info = json!({
            "name": self.name,
            "version": self.version,
        });
        if let Some(title) = &self.title {
            client_info["title"] = json!(title);
        }

        json!({
            "protocolVersion": self.protocol_version,
            "capabilities": {
                "roots": { "listChanged": true },
                "sampling": {},
                "elicitation": {}
            },
            "clientInfo": client_info,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    #[serde(default)]
    protocol_version: Option<String>,
    #[serde(default)]
    server_info: Option<ServerInfo>,
}

/// An established MCP session.
///
/// Immutable once the handshake returns; every later call takes it by
/// reference and sends [`headers`](Self::headers).
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    endpoint: Url,
    session_id: String,
    protocol_version: String,
    server_info: Option<ServerInfo>,
}

impl Session {
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// Protocol revision the server answered with (or the requested one if
    /// the server did not say)
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    /// Headers required on every post-handshake request
    pub fn headers(&self) -> HeaderMap {
        let mut headers = base_headers();
        if let Ok(value) = HeaderValue::from_str(&self.session_id) {
            headers.insert(SESSION_HEADER, value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.protocol_version) {
            headers.insert(PROTOCOL_VERSION_HEADER, value);
        }
        headers
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers
}

/// Run the MCP lifecycle handshake against `endpoint`.
///
/// Sends `initialize`, takes the session id from the response header, then
/// sends `notifications/initialized`; the server rejects tool calls on a
/// session that skipped the notification. The notification reply is usually
/// `202` with an empty body, which is fine.
///
/// Fails with [`McpError::Handshake`] when the session header is missing,
/// before anything else is sent.
pub async fn initialize(transport: &McpTransport, endpoint: Url, client: &ClientInfo) -> Result<Session> {
    tracing::info!(endpoint = %endpoint, protocol_version = %client.protocol_version, "initializing MCP session");

    let request = JsonRpcRequest::new(RequestId::Number(1), "initialize", Some(client.initialize_params()));
    let reply = transport.post(&endpoint, base_headers(), &request).await?;

    let session_id = reply.session_id.clone().ok_or_else(|| {
        McpError::Handshake(format!("initialize response carried no {} header", SESSION_HEADER))
    })?;

    let init = initialize_result(&reply)?;
    let protocol_version = match init.as_ref().and_then(|r| r.protocol_version.clone()) {
        Some(server_version) => {
            if server_version != client.protocol_version {
                tracing::warn!(
                    requested = %client.protocol_version,
                    server = %server_version,
                    "MCP server answered with a different protocol version"
                );
            }
            server_version
        }
        None => client.protocol_version.clone(),
    };

    let session = Session {
        endpoint,
        session_id,
        protocol_version,
        server_info: init.and_then(|r| r.server_info),
    };
    tracing::debug!(session_id = %session.session_id, "session id assigned");

    let ready = JsonRpcRequest::notification("notifications/initialized");
    transport
        .post(&session.endpoint, session.headers(), &ready)
        .await
        .map_err(|e| McpError::Handshake(format!("initialized notification failed: {}", e)))?;

    tracing::info!(
        server = session.server_info.as_ref().map_or("unknown", |s| s.name.as_str()),
        protocol_version = %session.protocol_version,
        "MCP session ready"
    );
    Ok(session)
}

/// Decode the initialize result if the body has one. Only an explicit
/// JSON-RPC error fails the handshake here.
fn initialize_result(reply: &McpReply) -> Result<Option<InitializeResult>> {
    for payload in reply.payloads() {
        match ResponsePayload::classify(payload) {
            ResponsePayload::Error { code, message } => {
                return Err(McpError::Rpc {
                    code: code.unwrap_or_default(),
                    message: message.unwrap_or_else(|| "initialize rejected".to_string()),
                });
            }
            ResponsePayload::Result(result) => {
                return match serde_json::from_value(Value::Object(result)) {
                    Ok(init) => Ok(Some(init)),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not decode initialize result");
                        Ok(None)
                    }
                };
            }
            ResponsePayload::Other => continue,
        }
    }

    tracing::warn!("initialize response had no result payload");
    Ok(None)
}
