use serde_json::json;
use tablescout_core::{LlmRequest, LlmResponse, Message, Role};

#[test]
fn llm_request_serializes_lowercase_roles() {
    let req = LlmRequest {
        model: "gpt-4o".to_string(),
        messages: vec![
            Message::system("Return only SQL."),
            Message::user("count orders"),
        ],
        temperature: Some(0.0),
    };

    let value = serde_json::to_value(&req).expect("serialize");
    assert_eq!(
        value,
        json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "Return only SQL."},
                {"role": "user", "content": "count orders"}
            ],
            "temperature": 0.0
        })
    );
}

#[test]
fn llm_request_omits_unset_temperature() {
    let req = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hi")],
        temperature: None,
    };

    let value = serde_json::to_value(&req).expect("serialize");
    assert!(value.get("temperature").is_none());
}

#[test]
fn llm_response_deserializes() {
    let resp: LlmResponse =
        serde_json::from_value(json!({"content": "SELECT 1"})).expect("deserialize");
    assert_eq!(resp.content, "SELECT 1");
    assert_eq!(Message::user("x").role, Role::User);
}
