use crate::error::{McpError, Result};
use crate::sse::{self, EventStreamPayloads};
use crate::SESSION_HEADER;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Longest slice of an error body kept in [`McpError::Http`]
const ERROR_BODY_LIMIT: usize = 512;

/// Single-shot POST calls against an MCP endpoint.
///
/// Holds no per-session state; the caller supplies the headers (normally
/// [`Session::headers`](crate::Session::headers)) on every call.
#[derive(Debug, Clone, Default)]
pub struct McpTransport {
    http: reqwest::Client,
}

impl McpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a preconfigured client (timeouts, proxies, TLS roots)
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST one JSON-RPC message and read the whole reply.
    ///
    /// Network failures and non-2xx statuses are errors; the body of a
    /// successful reply is returned as-is, even when empty.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &Url,
        headers: HeaderMap,
        message: &T,
    ) -> Result<McpReply> {
        let response = self
            .http
            .post(endpoint.clone())
            .headers(headers)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        let session_id = header_str(response.headers(), SESSION_HEADER);
        let content_type = header_str(response.headers(), CONTENT_TYPE.as_str());

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let cut = (0..=ERROR_BODY_LIMIT).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(McpError::Http { status, body });
        }

        let body = response.text().await?;
        tracing::trace!(%status, content_type = ?content_type, bytes = body.len(), "mcp reply");

        Ok(McpReply {
            status,
            session_id,
            content_type,
            body,
        })
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Fully received reply to one POST
#[derive(Debug, Clone)]
pub struct McpReply {
    pub status: reqwest::StatusCode,
    pub session_id: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl McpReply {
    /// JSON-RPC payloads carried by the body.
    ///
    /// Event-stream bodies go through [`sse::parse`]. A plain
    /// `application/json` body is a single payload.
    pub fn payloads(&self) -> Payloads<'_> {
        let is_json = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"));

        if !is_json {
            return Payloads::Stream(sse::parse(&self.body));
        }

        if self.body.trim().is_empty() {
            return Payloads::Json(None);
        }
        match serde_json::from_str(&self.body) {
            Ok(value) => Payloads::Json(Some(value)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed JSON reply body");
                Payloads::Json(None)
            }
        }
    }
}

#[derive(Debug)]
pub enum Payloads<'a> {
    Stream(EventStreamPayloads<'a>),
    Json(Option<Value>),
}

impl Iterator for Payloads<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Self::Stream(stream) => stream.next(),
            Self::Json(value) => value.take(),
        }
    }
}
