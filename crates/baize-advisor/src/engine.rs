use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, StructuredOutputFormat};

use baize_core::AiSettings;

use crate::error::BackendError;

/// One outbound call: fixed instructions, the user content, and for
/// structured operations the reply schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub content: String,
    pub schema: Option<serde_json::Value>,
}

/// The remote generative-content capability.
///
/// Implementations are stateless from the caller's side, so any number of
/// calls may run against one backend concurrently.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    /// Backend identifier (provider/model).
    fn id(&self) -> &str;

    /// Perform one round trip and return the raw reply text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

fn map_backend(provider: &str) -> Result<LLMBackend, BackendError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(BackendError::Unavailable(format!("unknown provider: {other}"))),
    }
}

/// Production backend over the `llm` crate. Holds the credential captured
/// at start-up; a provider handle is built per call because the system
/// instruction differs between operations.
pub struct LlmEngine {
    id: String,
    backend: LLMBackend,
    model: String,
    api_key: String,
}

impl LlmEngine {
    pub fn from_settings(settings: &AiSettings) -> Result<Self, BackendError> {
        let backend = map_backend(&settings.provider)?;
        Ok(Self {
            id: format!("{}/{}", settings.provider, settings.model),
            backend,
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

fn structured_format(schema: &serde_json::Value) -> Result<StructuredOutputFormat, BackendError> {
    serde_json::from_value(serde_json::json!({
        "name": "TriviaQuestion",
        "schema": schema,
        "strict": true,
    }))
    .map_err(|e| BackendError::Unavailable(format!("schema: {e}")))
}

#[async_trait]
impl AdvisoryBackend for LlmEngine {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let mut builder = LLMBuilder::new()
            .backend(self.backend.clone())
            .model(&self.model)
            .system(&request.system);

        if !self.api_key.is_empty() {
            builder = builder.api_key(&self.api_key);
        }

        if let Some(schema) = &request.schema {
            builder = builder.schema(structured_format(schema)?);
        }

        let llm = builder
            .build()
            .map_err(|e| BackendError::Unavailable(format!("build LLM: {e}")))?;

        let messages = vec![ChatMessage::user().content(&request.content).build()];

        let response = llm
            .chat(&messages)
            .await
            .map_err(|e| BackendError::Request(format!("chat: {e}")))?;

        // Blank replies are the caller's concern; pass them through.
        Ok(response.text().unwrap_or_default())
    }
}

/// Stand-in used when no provider is configured. Every call fails, which
/// drives each operation to its degraded result.
pub struct UnconfiguredBackend;

#[async_trait]
impl AdvisoryBackend for UnconfiguredBackend {
    fn id(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, BackendError> {
        Err(BackendError::Unavailable("AI provider not configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_settings() {
        let engine = LlmEngine::from_settings(&AiSettings::default()).unwrap();
        assert_eq!(engine.id(), "google/gemini-3-flash-preview");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let settings = AiSettings {
            provider: "carrier-pigeon".into(),
            ..AiSettings::default()
        };
        assert!(matches!(
            LlmEngine::from_settings(&settings),
            Err(BackendError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_always_fails() {
        let request = GenerationRequest {
            system: String::new(),
            content: "hi".into(),
            schema: None,
        };
        assert!(UnconfiguredBackend.generate(&request).await.is_err());
    }
}
