//! LLM integration for TalentScout.
//!
//! The conversation only needs two generated messages (the greeting and the
//! technical question), so the surface is small: a provider trait, one
//! OpenAI-compatible HTTP provider, and `TextGenerator`, which turns every
//! failure into fallback text.

pub mod generator;
pub mod openai;
pub mod provider;

pub use generator::{Generation, GeneratorConfig, TextGenerator, fallback_text};
pub use openai::OpenAiCompatProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::config::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::error::LlmError;

/// Configuration for the generation backend.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    /// `None` runs the service offline on fallback text.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(20),
        }
    }
}

/// Create an LLM provider from configuration, if a key is present.
pub fn create_provider(config: &LlmConfig) -> Result<Option<Arc<dyn LlmProvider>>, LlmError> {
    let Some(api_key) = config.api_key.clone() else {
        return Ok(None);
    };
    let provider = OpenAiCompatProvider::new(config, api_key)?;
    tracing::info!(model = %config.model, url = %config.api_url, "Using chat-completions provider");
    Ok(Some(Arc::new(provider)))
}

/// Build the text generator the conversation uses.
pub fn create_generator(config: &LlmConfig) -> Result<TextGenerator, LlmError> {
    let generator_config = GeneratorConfig {
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        timeout: config.timeout,
    };
    Ok(match create_provider(config)? {
        Some(llm) => TextGenerator::new(llm, generator_config),
        None => {
            tracing::warn!("No API key configured; generated messages will use fallback text");
            TextGenerator::offline()
        }
    })
}
