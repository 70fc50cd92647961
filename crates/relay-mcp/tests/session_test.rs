use mockito::{Matcher, Mock, ServerGuard};
use relay_mcp::{ClientInfo, McpClient, McpError, ToolOutcome, PROTOCOL_VERSION};
use serde_json::{json, Map, Value};

const SESSION_ID: &str = "2d27d9b84afc45cd983e256b2772dab0";

fn sse(payload: Value) -> String {
    format!("event: message\ndata: {}\n\n", payload)
}

fn endpoint(server: &ServerGuard) -> String {
    format!("{}/mcp", server.url())
}

async fn mock_initialize(server: &mut ServerGuard, protocol_version: &str) -> Mock {
    server
        .mock("POST", "/mcp")
        .match_header("accept", "application/json, text/event-stream")
        .match_body(Matcher::PartialJson(json!({"method": "initialize", "id": 1})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_header("mcp-session-id", SESSION_ID)
        .with_body(sse(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "protocolVersion": protocol_version,
                "capabilities": {"tools": {"listChanged": true}},
                "serverInfo": {"name": "jeongsu_demo", "version": "2.13.0.2"}
            }
        })))
        .create_async()
        .await
}

async fn mock_initialized(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/mcp")
        .match_header("mcp-session-id", SESSION_ID)
        .match_body(Matcher::PartialJson(json!({"method": "notifications/initialized"})))
        .with_status(202)
        .with_header("content-type", "application/json")
        .create_async()
        .await
}

async fn connected(server: &mut ServerGuard) -> McpClient {
    mock_initialize(server, PROTOCOL_VERSION).await;
    mock_initialized(server).await;
    McpClient::connect(&endpoint(server), &ClientInfo::default()).await.unwrap()
}

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("arguments must be an object"),
    }
}

#[tokio::test]
async fn test_handshake_captures_session() {
    let mut server = mockito::Server::new_async().await;
    let init = mock_initialize(&mut server, PROTOCOL_VERSION).await;
    let ready = mock_initialized(&mut server).await;

    let client = McpClient::connect(&endpoint(&server), &ClientInfo::new("ExampleClient", "1.0.0"))
        .await
        .unwrap();

    init.assert_async().await;
    ready.assert_async().await;

    let session = client.session();
    assert_eq!(session.id(), SESSION_ID);
    assert_eq!(session.protocol_version(), PROTOCOL_VERSION);
    assert_eq!(session.server_info().map(|s| s.name.as_str()), Some("jeongsu_demo"));
}

#[tokio::test]
async fn test_missing_session_header_is_a_handshake_error() {
    let mut server = mockito::Server::new_async().await;
    let _init = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "initialize"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse(json!({"jsonrpc": "2.0", "id": 1, "result": {"protocolVersion": PROTOCOL_VERSION}})))
        .create_async()
        .await;
    let ready = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "notifications/initialized"})))
        .expect(0)
        .create_async()
        .await;

    let err = McpClient::connect(&endpoint(&server), &ClientInfo::default())
        .await
        .unwrap_err();

    assert!(matches!(err, McpError::Handshake(_)), "{err:?}");
    ready.assert_async().await;
}

#[tokio::test]
async fn test_protocol_version_mismatch_is_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    mock_initialize(&mut server, "2025-03-26").await;
    mock_initialized(&mut server).await;

    let client = McpClient::connect(&endpoint(&server), &ClientInfo::default())
        .await
        .unwrap();

    assert_eq!(client.session().protocol_version(), "2025-03-26");
}

#[tokio::test]
async fn test_rejected_ready_notification_fails_handshake() {
    let mut server = mockito::Server::new_async().await;
    mock_initialize(&mut server, PROTOCOL_VERSION).await;
    let _ready = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "notifications/initialized"})))
        .with_status(400)
        .with_body("Bad Request: Missing session ID")
        .create_async()
        .await;

    let err = McpClient::connect(&endpoint(&server), &ClientInfo::default())
        .await
        .unwrap_err();

    assert!(matches!(err, McpError::Handshake(_)), "{err:?}");
}

#[tokio::test]
async fn test_list_tools() {
    let mut server = mockito::Server::new_async().await;
    let client = connected(&mut server).await;

    let list = server
        .mock("POST", "/mcp")
        .match_header("mcp-session-id", SESSION_ID)
        .match_header("mcp-protocol-version", PROTOCOL_VERSION)
        .match_body(Matcher::PartialJson(json!({"method": "tools/list"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"tools": [
                {"name": "current_time", "inputSchema": {"properties": {}, "type": "object"}},
                {"name": "get_weather", "description": "Weather for a city",
                 "inputSchema": {"properties": {"city": {"type": "string"}}, "required": ["city"], "type": "object"}}
            ]}
        })))
        .create_async()
        .await;

    let tools = client.llm_tools().await.unwrap();

    list.assert_async().await;
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].function.name, "current_time");
    assert_eq!(tools[0].function.description, "");
    assert_eq!(tools[1].function.parameters["required"], json!(["city"]));
}

#[tokio::test]
async fn test_list_tools_rpc_error() {
    let mut server = mockito::Server::new_async().await;
    let client = connected(&mut server).await;

    let _list = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "tools/list"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "Method not found"}})))
        .create_async()
        .await;

    let err = client.list_tools().await.unwrap_err();
    assert!(matches!(err, McpError::Rpc { code: -32601, .. }), "{err:?}");
}

#[tokio::test]
async fn test_call_tool_both_result_shapes_agree() {
    let expected = json!("weather in Seoul: Sunny, 25°C");

    let shapes = [
        json!({"content": [{"type": "text", "text": "weather in Seoul: Sunny, 25°C"}],
               "structuredContent": {"result": "weather in Seoul: Sunny, 25°C"},
               "isError": false}),
        json!({"result": "weather in Seoul: Sunny, 25°C"}),
    ];

    for result in shapes {
        let mut server = mockito::Server::new_async().await;
        let client = connected(&mut server).await;

        let call = server
            .mock("POST", "/mcp")
            .match_header("mcp-session-id", SESSION_ID)
            .match_body(Matcher::PartialJson(json!({
                "method": "tools/call",
                "params": {"name": "get_weather", "arguments": {"city": "Seoul"}}
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(sse(json!({"jsonrpc": "2.0", "id": "x", "result": result})))
            .create_async()
            .await;

        let outcome = client.call_tool("get_weather", args(json!({"city": "Seoul"}))).await;

        call.assert_async().await;
        assert_eq!(outcome, ToolOutcome::Success(expected.clone()));
    }
}

#[tokio::test]
async fn test_call_tool_http_failure_becomes_error_outcome() {
    let mut server = mockito::Server::new_async().await;
    let client = connected(&mut server).await;

    let call = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "tools/call"})))
        .with_status(500)
        .with_body("internal")
        .expect(1)
        .create_async()
        .await;

    let outcome = client.call_tool("current_time", Map::new()).await;

    call.assert_async().await;
    match outcome {
        ToolOutcome::Error(message) => assert!(message.contains("500"), "{message}"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_call_tool_server_error_payload() {
    let mut server = mockito::Server::new_async().await;
    let client = connected(&mut server).await;

    let _call = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "tools/call"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(format!(
            "{}{}",
            "event: message\ndata: {broken\n\n",
            sse(json!({"jsonrpc": "2.0", "id": "x", "error": {"code": -32602, "message": "Unknown tool: nope"}}))
        ))
        .create_async()
        .await;

    let outcome = client.call_tool("nope", Map::new()).await;
    assert_eq!(outcome, ToolOutcome::Error("Unknown tool: nope".to_string()));
}

#[tokio::test]
async fn test_call_tool_generates_fresh_ids() {
    let mut server = mockito::Server::new_async().await;
    let client = connected(&mut server).await;

    let call = server
        .mock("POST", "/mcp")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"method": "tools/call"})),
            Matcher::Regex(r#""id":"[0-9a-f-]{36}""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse(json!({"jsonrpc": "2.0", "id": "x", "result": {"result": "ok"}})))
        .expect(2)
        .create_async()
        .await;

    assert_eq!(client.call_tool("current_time", Map::new()).await, ToolOutcome::Success(json!("ok")));
    assert_eq!(client.call_tool("current_time", Map::new()).await, ToolOutcome::Success(json!("ok")));
    call.assert_async().await;
}

#[tokio::test]
async fn test_list_tools_follows_cursor() {
    let mut server = mockito::Server::new_async().await;
    let client = connected(&mut server).await;

    // A request without params ends right after the method name
    let first = server
        .mock("POST", "/mcp")
        .match_body(Matcher::Regex(r#""method":"tools/list"\}$"#.to_string()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"tools": [{"name": "current_time"}], "nextCursor": "page-2"}
        })))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "tools/list", "params": {"cursor": "page-2"}})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": {"tools": [{"name": "get_weather"}]}
        })))
        .expect(1)
        .create_async()
        .await;

    let tools = client.list_tools().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["current_time", "get_weather"]);
}
