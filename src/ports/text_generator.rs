//! Text Generation Port - Natural-language Portfolio Commentary

use async_trait::async_trait;

/// Trait for LLM-backed text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
  /// Generate a response for `prompt`.
  async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
