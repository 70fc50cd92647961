use mockito::Matcher;
use relay_cli::commands::{ask, call, tools};
use relay_cli::config::Config;
use relay_llm::{ClientFactory, OpenAIConfig};
use relay_mcp::ToolOutcome;
use relay_server::ServerConfig;
use serde_json::json;
use tokio::net::TcpListener;

async fn config_for_demo_server() -> Config {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(relay_server::serve(
        listener,
        ServerConfig::default().with_fixed_time("2050-11-22 15:00"),
    ));

    let mut config = Config::default();
    config.mcp.endpoint = format!("http://{}/mcp", addr);
    config
}

#[tokio::test]
async fn test_tools_lists_demo_tools() {
    let config = config_for_demo_server().await;

    let tools = tools::execute(&config).await.unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["current_time", "get_weather"]);
}

#[tokio::test]
async fn test_call_runs_tool_directly() {
    let config = config_for_demo_server().await;

    let arguments = call::parse_arguments(r#"{"city": "Busan"}"#).unwrap();
    let outcome = call::execute(&config, "get_weather", arguments).await.unwrap();

    assert_eq!(outcome, ToolOutcome::Success(json!("weather in Busan: Sunny, 25°C")));
}

#[tokio::test]
async fn test_unreachable_server_fails_handshake() {
    let mut config = Config::default();
    config.mcp.endpoint = "http://127.0.0.1:1/mcp".to_string();

    let err = tools::execute(&config).await.unwrap_err();
    assert!(err.to_string().contains("MCP handshake"));
}

#[tokio::test]
async fn test_ask_forwards_tool_output_into_second_completion() {
    let config = config_for_demo_server().await;
    let mut openai = mockito::Server::new_async().await;

    let first = openai
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""tools":\["#.to_string()),
            Matcher::PartialJson(json!({"model": "gpt-5-nano", "tool_choice": "auto"})),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_weather",
                            "type": "function",
                            "function": {"name": "get_weather", "arguments": "{\"city\":\"Seoul\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let second = openai
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""role":"tool""#.to_string()),
            Matcher::Regex(r#""tool_call_id":"call_weather""#.to_string()),
            Matcher::Regex("weather in Seoul: Sunny, 25°C".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "It's sunny and 25°C in Seoul."},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let llm = ClientFactory::create_chat_client(OpenAIConfig::new("sk-test").with_base_url(openai.url())).unwrap();

    let output = ask::execute(&config, llm, "What's the weather like in Seoul?")
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(output.answer, "It's sunny and 25°C in Seoul.");
    assert_eq!(output.llm_calls, 2);
    assert_eq!(output.tool_rounds, 1);
}
