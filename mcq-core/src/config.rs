//! Configuration for the quiz system.
//!
//! Maps directly to `mcq.toml`. Every field has a default, so an empty file
//! (or no file at all) is a valid configuration that runs in placeholder mode.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McqConfig {
    /// Logging settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Quiz sizing limits.
    #[serde(default)]
    pub quiz: QuizLimits,
    /// Question generation settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl McqConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `QuizError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::QuizError::Config(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Upper bounds applied to every quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizLimits {
    /// Most questions a single quiz may hold.
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    /// Most document pages whose text is sent for generation.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for QuizLimits {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            max_pages: default_max_pages(),
        }
    }
}

impl QuizLimits {
    /// Clamp a requested question count into `1..=max_questions`.
    ///
    /// No request, or a request for zero, means the maximum.
    #[must_use]
    pub fn target_questions(&self, requested: Option<usize>) -> usize {
        let ceiling = self.max_questions.max(1);
        requested.filter(|&n| n > 0).unwrap_or(ceiling).min(ceiling)
    }
}

/// Which provider is tried first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPreference {
    /// OpenRouter first, then OpenAI.
    #[default]
    OpenRouter,
    /// OpenAI first, then OpenRouter.
    OpenAi,
    /// Never call a provider; always use the placeholder question.
    Dummy,
}

impl std::str::FromStr for ProviderPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(Self::OpenRouter),
            "openai" => Ok(Self::OpenAi),
            "dummy" => Ok(Self::Dummy),
            other => Err(format!("unknown llm provider: '{other}'")),
        }
    }
}

/// Question generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider tried first: "openrouter", "openai" or "dummy".
    #[serde(default, deserialize_with = "de_preference")]
    pub provider: ProviderPreference,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum output tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Hard timeout for one HTTP attempt in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Wait before each attempt on rate limiting, in seconds. Its length is
    /// the attempt count.
    #[serde(default = "default_retry_delays")]
    pub retry_delays_secs: Vec<u64>,
    /// Optional TOML file replacing the built-in prompt templates.
    #[serde(default)]
    pub prompt_file: Option<PathBuf>,
    /// OpenAI endpoint.
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// OpenRouter endpoint.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderPreference::default(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_ms: default_timeout_ms(),
            retry_delays_secs: default_retry_delays(),
            prompt_file: None,
            openai: OpenAiConfig::default(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

/// OpenAI credentials and model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key; the provider is unavailable without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Chat model.
    #[serde(default = "default_openai_model")]
    pub model: String,
    /// API base URL (without `/chat/completions`).
    #[serde(default = "default_openai_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_url(),
        }
    }
}

/// OpenRouter credentials, model and attribution headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// API key; the provider is unavailable without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Chat model.
    #[serde(default = "default_openrouter_model")]
    pub model: String,
    /// API base URL (without `/chat/completions`).
    #[serde(default = "default_openrouter_url")]
    pub base_url: String,
    /// Sent as `HTTP-Referer`.
    #[serde(default = "default_site")]
    pub site: String,
    /// Sent as `X-Title`.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openrouter_model(),
            base_url: default_openrouter_url(),
            site: default_site(),
            title: default_title(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value helpers (serde requires functions)
// ---------------------------------------------------------------------------

fn de_preference<'de, D>(deserializer: D) -> Result<ProviderPreference, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_questions() -> usize {
    6
}
fn default_max_pages() -> usize {
    5
}
fn default_temperature() -> f64 {
    0.3
}
fn default_max_tokens() -> u32 {
    1200
}
fn default_timeout_ms() -> u64 {
    60_000
}
fn default_retry_delays() -> Vec<u64> {
    vec![0, 2, 4]
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_openrouter_model() -> String {
    "mistralai/mistral-7b-instruct:free".to_string()
}
fn default_openrouter_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}
fn default_site() -> String {
    "http://localhost".to_string()
}
fn default_title() -> String {
    "PDF MCQ Agent".to_string()
}
