//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::LlmConfig;

/// Default chat-completion endpoint (Groq, OpenAI-compatible).
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Default model name.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
/// Country code preselected on the phone step.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    /// Text generation settings.
    pub llm: LlmConfig,
    /// Port for the REST server.
    pub port: u16,
    /// Dial prefix selected when a session starts.
    pub default_country_code: String,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            port: 8080,
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}

impl ScreeningConfig {
    /// Build configuration from `TALENT_SCOUT_*` environment variables.
    ///
    /// Unset variables fall back to defaults. A value that is set but does
    /// not parse is an error. A missing API key is allowed: generation then
    /// always uses fallback text.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = std::env::var("TALENT_SCOUT_API_KEY")
            .or_else(|_| std::env::var("GROQ_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(secrecy::SecretString::from);

        let api_url =
            std::env::var("TALENT_SCOUT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("TALENT_SCOUT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = parse_var("TALENT_SCOUT_MAX_TOKENS", defaults.llm.max_tokens)?;
        let temperature = parse_var("TALENT_SCOUT_TEMPERATURE", defaults.llm.temperature)?;
        let timeout_secs = parse_var(
            "TALENT_SCOUT_TIMEOUT_SECS",
            defaults.llm.timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TALENT_SCOUT_TIMEOUT_SECS".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        let port = parse_var("TALENT_SCOUT_PORT", defaults.port)?;

        let default_country_code = std::env::var("TALENT_SCOUT_DEFAULT_COUNTRY")
            .unwrap_or(defaults.default_country_code);
        if crate::screening::countries::lookup(&default_country_code).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "TALENT_SCOUT_DEFAULT_COUNTRY".to_string(),
                message: format!("unknown dial code {default_country_code}"),
            });
        }

        Ok(Self {
            llm: LlmConfig {
                api_url,
                api_key,
                model,
                max_tokens,
                temperature,
                timeout: Duration::from_secs(timeout_secs),
            },
            port,
            default_country_code,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
