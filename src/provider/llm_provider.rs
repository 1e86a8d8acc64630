//! `llm` crate adapter implementing [`DiagnosisProvider`].

use async_trait::async_trait;
use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::DiagnosisProvider;
use crate::error::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Backends reachable through the `llm` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderBackend {
    #[default]
    OpenAI,
    Anthropic,
    OpenRouter,
    Ollama,
    Google,
}

impl ProviderBackend {
    /// Name used in config files, logs and the secrets lookup.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderBackend::OpenAI => "openai",
            ProviderBackend::Anthropic => "anthropic",
            ProviderBackend::OpenRouter => "openrouter",
            ProviderBackend::Ollama => "ollama",
            ProviderBackend::Google => "google",
        }
    }

    /// Whether the backend needs an API key to be usable.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderBackend::Ollama)
    }

    fn to_llm(self) -> LLMBackend {
        match self {
            ProviderBackend::OpenAI => LLMBackend::OpenAI,
            ProviderBackend::Anthropic => LLMBackend::Anthropic,
            ProviderBackend::OpenRouter => LLMBackend::OpenRouter,
            ProviderBackend::Ollama => LLMBackend::Ollama,
            ProviderBackend::Google => LLMBackend::Google,
        }
    }
}

/// Sends each prompt as a single user message through an `llm` backend.
///
/// The `llm` provider is built per request because the model is a
/// per-request argument of [`DiagnosisProvider::complete`].
///
/// # Example
///
/// ```ignore
/// use mimir::provider::{LlmDiagnosisProvider, ProviderBackend};
///
/// let provider = LlmDiagnosisProvider::new(ProviderBackend::OpenAI, Some("sk-your-key"))
///     .timeout_secs(60);
/// ```
pub struct LlmDiagnosisProvider {
    backend: ProviderBackend,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: u64,
    temperature: Option<f32>,
}

impl LlmDiagnosisProvider {
    pub fn new(backend: ProviderBackend, api_key: Option<impl Into<String>>) -> Self {
        Self {
            backend,
            api_key: api_key.map(|k| k.into()),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
        }
    }

    /// Override the backend base URL (e.g. a local Ollama instance).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn build_provider(&self, model: &str) -> Result<Box<dyn LLMProvider>, ProviderError> {
        if self.backend.requires_api_key() && self.api_key.is_none() {
            return Err(ProviderError::Configuration(format!(
                "no API key configured for {}",
                self.backend.as_str()
            )));
        }

        let mut builder = LLMBuilder::new()
            .backend(self.backend.to_llm())
            .model(model)
            .timeout_seconds(self.timeout_secs);
        if let Some(ref key) = self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(ref url) = self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(temp) = self.temperature {
            builder = builder.temperature(temp);
        }

        builder
            .build()
            .map_err(|e| ProviderError::Configuration(e.to_string()))
    }
}

#[async_trait]
impl DiagnosisProvider for LlmDiagnosisProvider {
    fn name(&self) -> &str {
        self.backend.as_str()
    }

    #[instrument(name = "llm.complete", skip(self, prompt), fields(model = %model, provider = %self.backend.as_str()))]
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let provider = self.build_provider(model)?;
        let messages = vec![ChatMessage::user().content(prompt).build()];

        let response = provider
            .chat(&messages)
            .await
            .map_err(ProviderError::from)?;

        let text = response.text().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        debug!(chars = text.chars().count(), "provider replied");
        Ok(text)
    }
}
