use async_trait::async_trait;
use tablescout_core::ScoutError;
use tablescout_llm::{Llm, LlmRequest, LlmResponse, OllamaClient, OpenAiCompatibleClient};

struct DummyLlm;

#[async_trait]
impl tablescout_core::Runnable<LlmRequest, LlmResponse> for DummyLlm {
    async fn invoke(&self, _input: LlmRequest) -> Result<LlmResponse, ScoutError> {
        Ok(LlmResponse {
            content: "ok".to_string(),
        })
    }
}

fn assert_llm<T: Llm>() {}

#[test]
fn dummy_llm_implements_llm() {
    assert_llm::<DummyLlm>();
}

#[test]
fn provider_clients_implement_llm() {
    assert_llm::<OllamaClient>();
    assert_llm::<OpenAiCompatibleClient>();
}
