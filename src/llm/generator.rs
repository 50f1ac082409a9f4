//! Text generator — the only place a failed LLM call becomes fallback text.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::LlmError;

use super::provider::{ChatMessage, CompletionRequest, LlmProvider};

/// Prefix of every fallback message.
pub const FALLBACK_PREFIX: &str = "Hello! I'm TalentScout, your AI hiring assistant.";

/// Outcome of a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The provider produced text.
    Text(String),
    /// The provider failed (or none is configured); `text` is the
    /// deterministic substitute.
    Fallback { text: String, reason: String },
}

impl Generation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Fallback { text, .. } => text,
        }
    }
}

/// Deterministic fallback for `prompt`. Always contains the prompt so the
/// conversation stays intelligible.
pub fn fallback_text(prompt: &str) -> String {
    format!("{FALLBACK_PREFIX} {prompt}")
}

/// Sampling and timeout settings for generation calls.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on one call, on top of any transport timeout.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(20),
        }
    }
}

/// Wraps an optional `LlmProvider` and never fails.
pub struct TextGenerator {
    llm: Option<Arc<dyn LlmProvider>>,
    config: GeneratorConfig,
}

impl TextGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self {
            llm: Some(llm),
            config,
        }
    }

    /// A generator with no backend; every call yields fallback text.
    pub fn offline() -> Self {
        Self {
            llm: None,
            config: GeneratorConfig::default(),
        }
    }

    /// Generate text for `prompt` with an optional system context.
    ///
    /// Single attempt, bounded by `config.timeout`.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Generation {
        let Some(llm) = self.llm.as_ref() else {
            return Generation::Fallback {
                text: fallback_text(prompt),
                reason: "no LLM provider configured".to_string(),
            };
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let request = CompletionRequest::new(messages)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        let result = match tokio::time::timeout(self.config.timeout, llm.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                provider: llm.model_name().to_string(),
                timeout: self.config.timeout,
            }),
        };

        match result {
            Ok(response) if !response.content.trim().is_empty() => {
                info!(
                    model = llm.model_name(),
                    output_tokens = response.output_tokens,
                    "Generated assistant text"
                );
                Generation::Text(response.content.trim().to_string())
            }
            Ok(_) => {
                warn!(model = llm.model_name(), "LLM returned empty text, using fallback");
                Generation::Fallback {
                    text: fallback_text(prompt),
                    reason: "empty response".to_string(),
                }
            }
            Err(e) => {
                warn!(model = llm.model_name(), error = %e, "LLM call failed, using fallback");
                Generation::Fallback {
                    text: fallback_text(prompt),
                    reason: e.to_string(),
                }
            }
        }
    }
}
