use axum::{
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use relay_mcp::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, RequestId, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use relay_mcp::{PROTOCOL_VERSION, SESSION_HEADER};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use crate::tools;

/// Protocol revisions the server will echo back in `initialize`
const SUPPORTED_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
    #[serde(default)]
    client_info: Option<ClientInfoParams>,
}

#[derive(Debug, Deserialize)]
struct ClientInfoParams {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

/// POST on the MCP endpoint: one JSON-RPC message per request.
pub async fn http_post(State(state): State<AppState>, headers: HeaderMap, body: String) -> ServerResult<Response> {
    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable JSON-RPC message");
            let reply = JsonRpcResponse::failure(None, PARSE_ERROR, format!("Parse error: {}", e));
            return rpc_reply(&headers, &reply, None);
        }
    };

    if request.method == "initialize" {
        return initialize(&state, &headers, request).await;
    }

    let session_id = header_str(&headers, SESSION_HEADER).ok_or(ServerError::MissingSession)?;

    let initialized = {
        let mut sessions = state.sessions.write().await;
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| ServerError::UnknownSession(session_id.to_string()))?;

        if request.is_notification() {
            if request.method == "notifications/initialized" {
                entry.initialized = true;
                tracing::info!(session_id, "session initialized");
            } else {
                tracing::debug!(session_id, method = %request.method, "notification ignored");
            }
            return Ok(StatusCode::ACCEPTED.into_response());
        }
        entry.initialized
    };

    let reply = if initialized || request.method == "ping" {
        dispatch(&state, request)
    } else {
        JsonRpcResponse::failure(
            request.id,
            INVALID_REQUEST,
            "Received request before initialization was complete",
        )
    };

    rpc_reply(&headers, &reply, None)
}

pub async fn http_get() -> impl IntoResponse {
    // No server-initiated messages
    (StatusCode::METHOD_NOT_ALLOWED, "event stream not supported")
}

/// DELETE ends a session
pub async fn http_delete(State(state): State<AppState>, headers: HeaderMap) -> ServerResult<StatusCode> {
    let session_id = header_str(&headers, SESSION_HEADER).ok_or(ServerError::MissingSession)?;
    state
        .sessions
        .write()
        .await
        .remove(session_id)
        .ok_or_else(|| ServerError::UnknownSession(session_id.to_string()))?;

    tracing::info!(session_id, "session closed");
    Ok(StatusCode::ACCEPTED)
}

async fn initialize(state: &AppState, headers: &HeaderMap, request: JsonRpcRequest) -> ServerResult<Response> {
    if request.is_notification() {
        let reply = JsonRpcResponse::failure(None, INVALID_REQUEST, "initialize must be a request");
        return rpc_reply(headers, &reply, None);
    }

    let params: InitializeParams = match request.params {
        Some(params) => match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                let reply = JsonRpcResponse::failure(request.id, INVALID_PARAMS, format!("Invalid initialize params: {}", e));
                return rpc_reply(headers, &reply, None);
            }
        },
        None => InitializeParams::default(),
    };

    let protocol_version = params
        .protocol_version
        .filter(|v| SUPPORTED_VERSIONS.contains(&v.as_str()))
        .unwrap_or_else(|| PROTOCOL_VERSION.to_string());
    let client_name = params.client_info.map(|c| c.name);

    let session_id = state
        .open_session(protocol_version.clone(), client_name.clone())
        .await;

    tracing::info!(
        session_id = %session_id,
        client = client_name.as_deref().unwrap_or("unknown"),
        protocol_version = %protocol_version,
        "session opened"
    );

    let reply = JsonRpcResponse::success(
        request.id,
        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "experimental": {},
                "tools": {"listChanged": false}
            },
            "serverInfo": {
                "name": state.config.name,
                "version": state.config.version
            }
        }),
    );

    rpc_reply(headers, &reply, Some(&session_id))
}

fn dispatch(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id;

    match request.method.as_str() {
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({"tools": tools::catalog()})),
        "tools/call" => call_tool(state, id, request.params),
        method => {
            tracing::warn!(method, "unknown method");
            JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
        }
    }
}

fn call_tool(state: &AppState, id: Option<RequestId>, params: Option<Value>) -> JsonRpcResponse {
    let params: CallParams = match params.map(serde_json::from_value) {
        Some(Ok(params)) => params,
        Some(Err(e)) => {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid tools/call params: {}", e))
        }
        None => return JsonRpcResponse::failure(id, INVALID_PARAMS, "tools/call requires params"),
    };

    match tools::call(&state.config, &params.name, &params.arguments) {
        Ok(text) => {
            tracing::info!(tool = %params.name, output = %text, "tool called");
            JsonRpcResponse::success(id, tools::wrap_result(&text, state.config.result_shape))
        }
        Err(e) => {
            tracing::warn!(tool = %params.name, error = %e, "tool call rejected");
            JsonRpcResponse::failure(id, e.code(), e.to_string())
        }
    }
}

/// Frame one JSON-RPC reply. Event-stream framing when the client accepts it,
/// plain JSON otherwise.
fn rpc_reply(headers: &HeaderMap, reply: &JsonRpcResponse, session_id: Option<&str>) -> ServerResult<Response> {
    let json = serde_json::to_string(reply)?;

    let mut response = if accepts_event_stream(headers) {
        (
            [(CONTENT_TYPE, "text/event-stream")],
            format!("event: message\ndata: {}\n\n", json),
        )
            .into_response()
    } else {
        ([(CONTENT_TYPE, "application/json")], json).into_response()
    };

    if let Some(session_id) = session_id {
        if let Ok(value) = HeaderValue::from_str(session_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(SESSION_HEADER), value);
        }
    }

    Ok(response)
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    header_str(headers, ACCEPT.as_str()).map_or(false, |accept| accept.contains("text/event-stream"))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}
