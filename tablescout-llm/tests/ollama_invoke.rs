use httpmock::prelude::*;
use serde_json::json;
use tablescout_core::Runnable;
use tablescout_llm::{LlmRequest, Message, OllamaClient};

#[tokio::test]
async fn ollama_invoke_maps_response() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body_partial(r#"{"model": "llama3.1", "stream": false, "options": {"temperature": 0.0}}"#);
        then.status(200).json_body(json!({
            "message": {"role": "assistant", "content": "hello"},
            "done": true
        }));
    });

    let client = OllamaClient::new(server.url(""), "llama3.1".to_string()).expect("client");
    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hi")],
        temperature: Some(0.0),
    };

    let resp = client.invoke(req).await.expect("invoke");
    assert_eq!(resp.content, "hello");
    mock.assert();
}

#[tokio::test]
async fn ollama_invoke_surfaces_http_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(500).body("model not loaded");
    });

    let client = OllamaClient::new(server.url(""), "llama3.1".to_string()).expect("client");
    let err = client
        .invoke(LlmRequest {
            model: String::new(),
            messages: vec![Message::user("hi")],
            temperature: None,
        })
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("LLM provider failed"));
}
