use std::time::Duration;

pub mod models;
pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for the chat-completion endpoint. The API key is not part of it:
/// callers pass a credential with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model_name: String,
    pub base_url: String,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads `OPENAI_BASE_URL`, `OPENAI_MODEL`, `OPENAI_TEMPERATURE` and
    /// `OPENAI_TIMEOUT_SECS`, keeping defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            model_name: get("OPENAI_MODEL").unwrap_or(defaults.model_name),
            base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            temperature: get("OPENAI_TEMPERATURE")
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(defaults.temperature),
            request_timeout: get("OPENAI_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use super::prompts::{build_generation_prompt, build_improvement_prompt, Prompt};
    pub use paa_core::{ArticleResult, CompletionModel, Credential, Error, GenerationRequest, Result};
}

pub use models::create_model;
