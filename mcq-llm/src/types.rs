//! Core types for LLM requests and responses.

use serde::{Deserialize, Serialize};

/// A single-turn chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct LlmRequest {
    /// System prompt (persona and output rules).
    pub system: String,
    /// User prompt (source text and instructions).
    pub user: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,
    /// Ask the provider for a JSON object response.
    pub json_mode: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl LlmRequest {
    /// Create a JSON-mode request with low temperature, as used for quizzes.
    #[must_use]
    pub fn structured(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 1200,
            temperature: 0.3,
            json_mode: true,
            timeout_ms: 60_000,
        }
    }

    /// Set the sampling parameters.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f64, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A response from the LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    /// The generated text.
    pub text: String,
    /// How many tokens were generated.
    pub tokens_generated: u32,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model was used.
    pub model: String,
}

/// Question set exactly as a provider returns it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawQuestionSet {
    pub questions: Vec<RawQuestion>,
}

/// One question as returned by a provider. Only `id` may be absent.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawQuestion {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: i64,
    pub hint: String,
    pub explanation: String,
}
