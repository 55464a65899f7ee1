use reqwest::Client;
use serde::{Deserialize, Serialize};

use tablescout_core::{LlmRequest, LlmResponse, Message, Runnable, ScoutError};

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    http: Client,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self, ScoutError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?;
        Ok(Self {
            base_url,
            model,
            http,
        })
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OllamaClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ScoutError> {
        let LlmRequest {
            model,
            messages,
            temperature,
        } = input;
        let model = if model.is_empty() {
            self.model.clone()
        } else {
            model
        };
        let request = OllamaChatRequest {
            model,
            messages,
            stream: false,
            options: temperature.map(|temperature| OllamaOptions { temperature }),
        };

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let response: OllamaChatResponse = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?
            .error_for_status()
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?
            .json()
            .await
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?;

        Ok(LlmResponse {
            content: response.message.content,
        })
    }
}
