//! Generative language model interface

use async_trait::async_trait;

use crate::Result;

/// Generative language model
///
/// Implementations:
/// - `OllamaGenerator` - local model behind an Ollama endpoint
/// - scripted mocks in tests
///
/// Timeouts are enforced by the caller, not the backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`
    ///
    /// # Arguments
    /// * `prompt` - full prompt text
    /// * `max_tokens` - output length bound
    /// * `temperature` - sampling temperature
    async fn generate(&self, prompt: &str, max_tokens: usize, temperature: f32)
        -> Result<String>;

    /// Whether the backend can currently serve requests
    async fn is_available(&self) -> bool {
        true
    }

    /// Model name for logging
    fn name(&self) -> &str;
}
