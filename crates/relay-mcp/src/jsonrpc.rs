use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl RequestId {
    /// Fresh string id, unique per call
    pub fn random() -> Self {
        Self::String(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Request or notification (a notification has no `id`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,

    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<RequestId>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Shape of one payload received from the server, decided once at the parse
/// boundary. Any payload that has an `error` key is an error, whatever else it
/// carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Error {
        code: Option<i64>,
        message: Option<String>,
    },
    Result(Map<String, Value>),
    /// Notifications, non-object results and anything else
    Other,
}

impl ResponsePayload {
    pub fn classify(payload: Value) -> Self {
        let Value::Object(mut fields) = payload else {
            return Self::Other;
        };

        if let Some(error) = fields.remove("error") {
            return match error {
                Value::Object(obj) => Self::Error {
                    code: obj.get("code").and_then(Value::as_i64),
                    message: obj.get("message").and_then(Value::as_str).map(str::to_string),
                },
                Value::String(message) => Self::Error {
                    code: None,
                    message: Some(message),
                },
                _ => Self::Error {
                    code: None,
                    message: None,
                },
            };
        }

        match fields.remove("result") {
            Some(Value::Object(result)) => Self::Result(result),
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_has_no_id() {
        let value = serde_json::to_value(JsonRpcRequest::notification("notifications/initialized")).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    }

    #[test]
    fn test_request_ids_serialize_untagged() {
        let req = JsonRpcRequest::new(RequestId::Number(1), "initialize", None);
        assert_eq!(serde_json::to_value(&req).unwrap()["id"], 1);

        let req = JsonRpcRequest::new(RequestId::String("abc".into()), "tools/call", Some(json!({})));
        assert_eq!(serde_json::to_value(&req).unwrap()["id"], "abc");
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(RequestId::random(), RequestId::random());
    }

    #[test]
    fn test_classify_error_wins_over_result() {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Unknown tool"},
            "result": {"result": "should not be used"}
        });
        assert_eq!(
            ResponsePayload::classify(payload),
            ResponsePayload::Error {
                code: Some(-32602),
                message: Some("Unknown tool".into())
            }
        );
    }

    #[test]
    fn test_classify_null_error_is_still_error() {
        let payload = json!({"error": null, "result": {"result": 1}});
        assert!(matches!(ResponsePayload::classify(payload), ResponsePayload::Error { message: None, .. }));
    }

    #[test]
    fn test_classify_non_object_result_is_other() {
        assert_eq!(ResponsePayload::classify(json!({"result": "text"})), ResponsePayload::Other);
        assert_eq!(ResponsePayload::classify(json!({"method": "notifications/progress"})), ResponsePayload::Other);
        assert_eq!(ResponsePayload::classify(json!([1, 2])), ResponsePayload::Other);
    }
}
