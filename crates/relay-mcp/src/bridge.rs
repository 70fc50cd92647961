use crate::jsonrpc::{JsonRpcRequest, RequestId, ResponsePayload};
use crate::session::Session;
use crate::transport::McpTransport;
use serde_json::{json, Map, Value};

/// Used when the server reports an error without a message
pub const UNKNOWN_ERROR: &str = "unknown MCP error";

/// Used when no payload in the reply decides the call
pub const NO_VALID_RESPONSE: &str = "no valid result or error in MCP response";

/// Outcome of one `tools/call`.
///
/// Transport failures, JSON-RPC errors and tool-reported errors all end up in
/// `Error` so they can be handed back to the model as text.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Error(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn into_result(self) -> Result<Value, String> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(message) => Err(message),
        }
    }

    /// JSON-encoded form placed in a tool-result message:
    /// `{"result": value}` or `{"error": message}`
    pub fn to_message_content(&self) -> String {
        let wrapped = match self {
            Self::Success(value) => json!({ "result": value }),
            Self::Error(message) => json!({ "error": message }),
        };
        wrapped.to_string()
    }
}

impl From<Result<Value, String>> for ToolOutcome {
    fn from(result: Result<Value, String>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(message) => Self::Error(message),
        }
    }
}

/// Call `tool_name` on the server once. No retries.
pub async fn invoke(
    transport: &McpTransport,
    session: &Session,
    tool_name: &str,
    arguments: Map<String, Value>,
) -> ToolOutcome {
    let call_id = RequestId::random();
    tracing::info!(tool = tool_name, call_id = %call_id, "calling MCP tool");

    let request = JsonRpcRequest::new(
        call_id.clone(),
        "tools/call",
        Some(json!({
            "name": tool_name,
            "arguments": arguments,
        })),
    );

    let reply = match transport.post(session.endpoint(), session.headers(), &request).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(tool = tool_name, call_id = %call_id, error = %e, "tools/call request failed");
            return ToolOutcome::Error(e.to_string());
        }
    };
    tracing::debug!(tool = tool_name, body = %reply.body, "tools/call reply");

    let outcome = extract_outcome(reply.payloads());
    match &outcome {
        ToolOutcome::Success(value) => tracing::info!(tool = tool_name, result = %value, "tool succeeded"),
        ToolOutcome::Error(message) => tracing::warn!(tool = tool_name, error = %message, "tool failed"),
    }
    outcome
}

/// Decide the call from the reply payloads.
///
/// An `error` key in any payload decides the call as failed; error detection
/// runs over all payloads before any result is looked at. Otherwise the first
/// result object that decides it wins, checking in order: the `isError` flag,
/// `structuredContent.result`, then `result.result`. Servers emit the value at
/// one of the two locations depending on protocol revision.
pub fn extract_outcome(payloads: impl IntoIterator<Item = Value>) -> ToolOutcome {
    let mut results = Vec::new();
    for payload in payloads {
        match ResponsePayload::classify(payload) {
            ResponsePayload::Error { message, .. } => {
                return ToolOutcome::Error(message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()));
            }
            ResponsePayload::Result(result) => results.push(result),
            ResponsePayload::Other => {}
        }
    }

    results
        .into_iter()
        .find_map(outcome_from_result)
        .unwrap_or_else(|| ToolOutcome::Error(NO_VALID_RESPONSE.to_string()))
}

fn outcome_from_result(mut result: Map<String, Value>) -> Option<ToolOutcome> {
    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        let text = content_text(result.get("content"));
        return Some(ToolOutcome::Error(if text.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            text
        }));
    }

    if let Some(Value::Object(structured)) = result.get_mut("structuredContent") {
        if let Some(value) = structured.remove("result") {
            return Some(ToolOutcome::Success(value));
        }
    }

    result.remove("result").map(ToolOutcome::Success)
}

/// Joined text of the `{"type": "text"}` items of a content array
fn content_text(content: Option<&Value>) -> String {
    content
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
