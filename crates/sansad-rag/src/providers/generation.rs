//! Generation provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt-to-text generation
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate answer text for an assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}
