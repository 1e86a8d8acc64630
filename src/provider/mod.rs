//! The external text-generation collaborator.
//!
//! The pipeline only needs "prompt in, text out", so the seam is a single
//! async trait. [`LlmDiagnosisProvider`] implements it over the `llm` crate;
//! tests substitute their own implementations.

mod llm_provider;

pub use llm_provider::{DEFAULT_TIMEOUT_SECS, LlmDiagnosisProvider, ProviderBackend};

use async_trait::async_trait;

use crate::error::ProviderError;

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Anything that can turn a prompt into raw reply text.
///
/// Implementations report transport, availability and auth failures as
/// [`ProviderError`]; they never interpret the reply.
#[async_trait]
pub trait DiagnosisProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Send `prompt` to `model` and return the reply text.
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}
