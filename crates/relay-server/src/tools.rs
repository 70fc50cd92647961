//! The two demo tools and the result envelope they are returned in.

use crate::config::{ResultShape, ServerConfig};
use crate::error::ToolError;
use relay_mcp::McpTool;
use serde_json::{json, Map, Value};

pub const CURRENT_TIME: &str = "current_time";
pub const GET_WEATHER: &str = "get_weather";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn string_output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"result": {"type": "string"}},
        "required": ["result"]
    })
}

pub fn catalog() -> Vec<McpTool> {
    vec![
        McpTool::new(CURRENT_TIME)
            .with_description("Returns the current time")
            .with_input_schema(json!({"type": "object", "properties": {}}))
            .with_output_schema(string_output_schema()),
        McpTool::new(GET_WEATHER)
            .with_description("Returns the weather for a city")
            .with_input_schema(json!({
                "type": "object",
                "properties": {"city": {"type": "string", "title": "City"}},
                "required": ["city"]
            }))
            .with_output_schema(string_output_schema()),
    ]
}

/// Run one tool and return its text output.
pub fn call(config: &ServerConfig, name: &str, arguments: &Map<String, Value>) -> Result<String, ToolError> {
    match name {
        CURRENT_TIME => {
            let now = match &config.fixed_time {
                Some(time) => time.clone(),
                None => chrono::Local::now().format(TIME_FORMAT).to_string(),
            };
            Ok(format!("current time: {}", now))
        }
        GET_WEATHER => {
            let city = arguments
                .get("city")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolError::InvalidArguments {
                    tool: GET_WEATHER.to_string(),
                    reason: "`city` is required and must be a string".to_string(),
                })?;
            Ok(format!("weather in {}: Sunny, 25°C", city))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// `tools/call` result object. Text content is always present; the value
/// itself sits where `shape` says.
pub fn wrap_result(text: &str, shape: ResultShape) -> Value {
    let content = json!([{"type": "text", "text": text}]);
    match shape {
        ResultShape::Structured => json!({
            "content": content,
            "structuredContent": {"result": text},
            "isError": false
        }),
        ResultShape::Legacy => json!({
            "content": content,
            "result": text
        }),
    }
}
