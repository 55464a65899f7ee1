//! Generic OpenAI-compatible LLM client
//!
//! Supports any provider using OpenAI's chat completions format (OpenAI, DeepSeek,
//! Together, vLLM, LiteLLM proxies, ...).

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tablescout_core::{LlmRequest, LlmResponse, Message, Runnable, ScoutError};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Request body for chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

/// Non-streaming response from chat completions
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
    default_model: String,
    max_tokens: Option<u32>,
}

impl fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("OpenAiCompatibleClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &api_key)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::default()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn set_default_model(&mut self, model: impl Into<String>) {
        self.default_model = model.into();
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[derive(Default)]
pub struct OpenAiCompatibleBuilder {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    default_model: Option<String>,
    timeout: Option<Duration>,
    max_tokens: Option<u32>,
}

impl OpenAiCompatibleBuilder {
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, ScoutError> {
        let parsed = Url::parse(url.as_ref())
            .map_err(|err| ScoutError::InvalidConfig(format!("invalid base_url: {err}")))?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(SecretString::new(api_key.trim().to_string()))
        };
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, ScoutError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ScoutError::InvalidConfig("base_url is required".to_string()))?;
        let default_model = self
            .default_model
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| ScoutError::InvalidConfig("default_model is required".to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?;

        Ok(OpenAiCompatibleClient {
            http,
            base_url,
            api_key: self.api_key,
            default_model,
            max_tokens: self.max_tokens,
        })
    }
}

fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<OpenAiError>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OpenAiCompatibleClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ScoutError> {
        let LlmRequest {
            model,
            messages,
            temperature,
        } = input;
        let model = if model.is_empty() {
            self.default_model.clone()
        } else {
            model
        };
        let request = ChatCompletionRequest {
            model,
            messages,
            temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let mut builder = self.http.post(self.completions_url()).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ScoutError::LlmProvider(err.to_string()))?;

        if !status.is_success() {
            return Err(ScoutError::LlmProvider(format!(
                "HTTP {}: {}",
                status.as_u16(),
                provider_error_message(&body)
            )));
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|err| ScoutError::ParseFailed {
                output: body.clone(),
                reason: err.to_string(),
            })?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                model = %completion.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion finished"
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScoutError::LlmProvider("no choices returned".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
        })
    }
}
