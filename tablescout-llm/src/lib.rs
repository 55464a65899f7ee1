mod ollama;

// OpenAI-compatible client (always available)
pub mod openai_compatible;

pub use ollama::OllamaClient;
pub use tablescout_core::{Llm, LlmRequest, LlmResponse, Message, Role};

pub use openai_compatible::{
    ChatCompletionRequest, OpenAiCompatibleBuilder, OpenAiCompatibleClient,
};
