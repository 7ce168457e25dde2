//! Text-generation collaborator.
//!
//! Provides the [`TextGenerator`] trait and an OpenAI-compatible chat-completions
//! implementation. The generator is created via [`create_generator`] from
//! configuration. The core only assumes the reply is text.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::GenerationConfig;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Opaque function from prompt text to reply text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for `prompt` under the given system instructions.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    fn name(&self) -> &str;
}

/// Create a text generator from config.
///
/// Currently only `"openai"` (any OpenAI-compatible endpoint) is supported.
pub fn create_generator(config: &GenerationConfig) -> anyhow::Result<Box<dyn TextGenerator>> {
    match config.provider.as_str() {
        "openai" => {
            let generator = openai::OpenAiGenerator::new(config)?;
            Ok(Box::new(generator))
        }
        other => anyhow::bail!("unknown generation provider: {other}. Supported: openai"),
    }
}
