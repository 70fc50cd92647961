use crate::error::{McpError, Result};
use crate::jsonrpc::{JsonRpcRequest, RequestId, ResponsePayload};
use crate::session::Session;
use crate::transport::McpTransport;
use relay_llm::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Upper bound on `nextCursor` pages followed by [`list_tools`]
const MAX_PAGES: usize = 32;

/// Tool descriptor as advertised by an MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

impl McpTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
            output_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Schema used when a tool declares no parameters
pub fn empty_object_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

/// Project an MCP descriptor onto the function-calling shape. Never fails:
/// no description becomes `""`, no input schema becomes an empty object schema.
pub fn to_llm_tool(tool: &McpTool) -> Tool {
    let parameters = match &tool.input_schema {
        Some(schema) if !schema.is_null() => schema.clone(),
        _ => empty_object_schema(),
    };
    Tool::function(tool.name.clone(), tool.description.clone().unwrap_or_default(), parameters)
}

pub fn to_llm_tools(tools: &[McpTool]) -> Vec<Tool> {
    tools.iter().map(to_llm_tool).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListToolsResult {
    #[serde(default)]
    tools: Vec<McpTool>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Fetch the full tool catalog with `tools/list`, following pagination.
pub async fn list_tools(transport: &McpTransport, session: &Session) -> Result<Vec<McpTool>> {
    let mut tools = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_PAGES {
        let params = cursor.as_ref().map(|c| json!({ "cursor": c }));
        let request = JsonRpcRequest::new(RequestId::random(), "tools/list", params);
        let reply = transport.post(session.endpoint(), session.headers(), &request).await?;

        let page = reply
            .payloads()
            .find_map(|payload| match ResponsePayload::classify(payload) {
                ResponsePayload::Error { code, message } => Some(Err(McpError::Rpc {
                    code: code.unwrap_or_default(),
                    message: message.unwrap_or_else(|| "tools/list failed".to_string()),
                })),
                ResponsePayload::Result(result) => {
                    Some(serde_json::from_value::<ListToolsResult>(Value::Object(result)).map_err(McpError::from))
                }
                ResponsePayload::Other => None,
            })
            .unwrap_or_else(|| Err(McpError::Protocol("tools/list reply had no result".to_string())))?;

        tools.extend(page.tools);
        match page.next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => {
                tracing::debug!(count = tools.len(), "tool catalog fetched");
                return Ok(tools);
            }
        }
    }

    tracing::warn!(pages = MAX_PAGES, "tools/list pagination did not terminate, returning partial catalog");
    Ok(tools)
}
