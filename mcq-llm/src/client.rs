//! Generation client: provider selection, rate-limit retry and validation.
//!
//! ```text
//! select_provider ──none──▶ placeholder question (no network)
//!        │
//!      some
//!        ▼
//! attempt 1 ─429─▶ wait 2s ─▶ attempt 2 ─429─▶ wait 4s ─▶ attempt 3 ─429─▶ RateLimited
//!    │ other error: abort            │                        │
//!    ▼ ok                            ▼ ok                     ▼ ok
//! parse_questions ──▶ Vec<Question> | MalformedResponse
//! ```

use std::fmt;
use std::time::Duration;

use mcq_core::config::{LlmConfig, OpenAiConfig, OpenRouterConfig, ProviderPreference};
use mcq_core::types::{Question, QuestionId};
use tracing::{debug, info, warn};

use crate::error::{LlmError, TransportError};
use crate::parse::parse_questions;
use crate::prompt::PromptTemplate;
use crate::transport::{ChatTransport, Endpoint, HttpTransport};
use crate::types::{LlmRequest, LlmResponse};

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Which backend a [`Provider`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// api.openai.com
    OpenAi,
    /// openrouter.ai
    OpenRouter,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
        })
    }
}

/// A configured completion provider.
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi {
        /// Bearer token, if configured.
        api_key: Option<String>,
        /// Chat model.
        model: String,
        /// API base URL.
        base_url: String,
    },
    /// OpenRouter (OpenAI-compatible) with attribution headers.
    OpenRouter {
        /// Bearer token, if configured.
        api_key: Option<String>,
        /// Chat model.
        model: String,
        /// API base URL.
        base_url: String,
        /// `HTTP-Referer` header.
        site: String,
        /// `X-Title` header.
        title: String,
    },
}

impl Provider {
    /// Build the OpenAI provider from its config section.
    #[must_use]
    pub fn openai(config: &OpenAiConfig) -> Self {
        Self::OpenAi {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Build the OpenRouter provider from its config section.
    #[must_use]
    pub fn openrouter(config: &OpenRouterConfig) -> Self {
        Self::OpenRouter {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            site: config.site.clone(),
            title: config.title.clone(),
        }
    }

    /// Backend kind.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi { .. } => ProviderKind::OpenAi,
            Self::OpenRouter { .. } => ProviderKind::OpenRouter,
        }
    }

    /// Configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::OpenRouter { model, .. } => model,
        }
    }

    fn api_key(&self) -> Option<&str> {
        match self {
            Self::OpenAi { api_key, .. } | Self::OpenRouter { api_key, .. } => api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty()),
        }
    }

    /// Whether a non-empty credential is configured.
    #[must_use]
    pub fn credential_present(&self) -> bool {
        self.api_key().is_some()
    }

    /// Resolve the wire endpoint, or `None` without a credential.
    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint> {
        let api_key = self.api_key()?.to_string();
        Some(match self {
            Self::OpenAi { model, base_url, .. } => Endpoint {
                base_url: base_url.clone(),
                api_key,
                model: model.clone(),
                headers: Vec::new(),
            },
            Self::OpenRouter {
                model,
                base_url,
                site,
                title,
                ..
            } => Endpoint {
                base_url: base_url.clone(),
                api_key,
                model: model.clone(),
                headers: vec![
                    ("HTTP-Referer".to_string(), site.clone()),
                    ("X-Title".to_string(), title.clone()),
                ],
            },
        })
    }

    /// Send one completion attempt through `transport`.
    ///
    /// # Errors
    /// Returns [`TransportError::Status`] with status 401 if no credential is
    /// configured, otherwise whatever the transport returns.
    pub async fn invoke<T: ChatTransport>(
        &self,
        transport: &T,
        request: &LlmRequest,
    ) -> Result<LlmResponse, TransportError> {
        let endpoint = self.endpoint().ok_or_else(|| TransportError::Status {
            status: 401,
            body: format!("no API key configured for {}", self.kind()),
        })?;
        transport.complete(&endpoint, request).await
    }
}

/// Pick the provider to use, or `None` for placeholder mode.
///
/// The preferred provider wins if it has a credential, else the other one
/// if it does. A provider's runtime failures never cause fallback.
#[must_use]
pub fn select_provider<'a>(
    preference: ProviderPreference,
    openai: &'a Provider,
    openrouter: &'a Provider,
) -> Option<&'a Provider> {
    let order = match preference {
        ProviderPreference::OpenRouter => [openrouter, openai],
        ProviderPreference::OpenAi => [openai, openrouter],
        ProviderPreference::Dummy => return None,
    };
    order.into_iter().find(|p| p.credential_present())
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Delays applied before each attempt when the provider rate limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_secs(&[0, 2, 4])
    }
}

impl RetryPolicy {
    /// One entry per attempt; entry `i` is the wait before attempt `i + 1`.
    /// An empty schedule still makes one attempt.
    #[must_use]
    pub fn new(delays: Vec<Duration>) -> Self {
        if delays.is_empty() {
            Self {
                delays: vec![Duration::ZERO],
            }
        } else {
            Self { delays }
        }
    }

    /// Build from whole seconds.
    #[must_use]
    pub fn from_secs(secs: &[u64]) -> Self {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    /// A schedule of `attempts` attempts with no waiting.
    #[must_use]
    pub fn immediate(attempts: usize) -> Self {
        Self::new(vec![Duration::ZERO; attempts])
    }

    /// Total attempts.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.delays.len()
    }

    /// Per-attempt delays.
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Turns document text into validated questions.
///
/// Stateless between calls; safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GenerationClient<T = HttpTransport> {
    preference: ProviderPreference,
    openai: Provider,
    openrouter: Provider,
    transport: T,
    retry: RetryPolicy,
    prompt: PromptTemplate,
    temperature: f64,
    max_tokens: u32,
    timeout_ms: u64,
}

impl GenerationClient<HttpTransport> {
    /// Build an HTTP-backed client from configuration.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if a configured prompt file cannot be loaded.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::from_config_with_transport(config, HttpTransport::new())
    }
}

impl<T: ChatTransport> GenerationClient<T> {
    /// Build a client from configuration over an explicit transport.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if a configured prompt file cannot be loaded.
    pub fn from_config_with_transport(config: &LlmConfig, transport: T) -> Result<Self, LlmError> {
        let prompt = match &config.prompt_file {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::builtin(),
        };
        Ok(Self {
            preference: config.provider,
            openai: Provider::openai(&config.openai),
            openrouter: Provider::openrouter(&config.openrouter),
            transport,
            retry: RetryPolicy::from_secs(&config.retry_delays_secs),
            prompt,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_ms: config.request_timeout_ms,
        })
    }

    /// Replace the retry schedule.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the prompt templates.
    #[must_use]
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// The provider that would serve the next call, if any.
    #[must_use]
    pub fn selected_provider(&self) -> Option<&Provider> {
        select_provider(self.preference, &self.openai, &self.openrouter)
    }

    /// Whether a real provider is configured (otherwise placeholder mode).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.selected_provider().is_some()
    }

    /// Generate between 1 and `max_questions` questions from `text`.
    ///
    /// With no provider configured this returns the placeholder question
    /// without touching the network.
    ///
    /// # Errors
    /// - [`LlmError::RateLimited`] once every attempt was rate limited.
    /// - [`LlmError::Request`] on the first non-rate-limit failure.
    /// - [`LlmError::MalformedResponse`] if the output fails validation.
    pub async fn generate(&self, text: &str, max_questions: usize) -> Result<Vec<Question>, LlmError> {
        let max_questions = max_questions.max(1);

        let Some(provider) = self.selected_provider() else {
            warn!(
                preference = ?self.preference,
                "no LLM provider configured; returning placeholder question"
            );
            return placeholder_questions();
        };

        info!(
            provider = %provider.kind(),
            model = provider.model(),
            max_questions,
            text_chars = text.chars().count(),
            "generating questions"
        );

        let request = self.build_request(text, max_questions);
        let response = self.complete_with_retry(provider, &request).await?;
        debug!(
            latency_ms = response.latency_ms,
            tokens = response.tokens_generated,
            model = %response.model,
            "completion received"
        );

        let questions = parse_questions(&response.text, max_questions)?;
        info!(count = questions.len(), "questions generated");
        Ok(questions)
    }

    fn build_request(&self, text: &str, max_questions: usize) -> LlmRequest {
        let (system, user) = self.prompt.render(text, max_questions);
        LlmRequest::structured(system, user)
            .with_sampling(
                self.prompt.temperature.unwrap_or(self.temperature),
                self.prompt.max_tokens.unwrap_or(self.max_tokens),
            )
            .with_timeout(self.timeout_ms)
    }

    /// Run the attempt schedule. Only rate limiting is retried; the error of
    /// the last attempt is kept for the final report.
    async fn complete_with_retry(
        &self,
        provider: &Provider,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let attempts = self.retry.attempts();
        let mut last_error = None;

        for (attempt, delay) in self.retry.delays().iter().enumerate() {
            if !delay.is_zero() {
                debug!(
                    "Retrying {} call in {:?} (attempt {}/{})",
                    provider.kind(),
                    delay,
                    attempt + 1,
                    attempts
                );
                tokio::time::sleep(*delay).await;
            }

            match provider.invoke(&self.transport, request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_rate_limited() => {
                    warn!(
                        provider = %provider.kind(),
                        attempt = attempt + 1,
                        attempts,
                        error = %err,
                        "provider rate limited"
                    );
                    last_error = Some(err);
                }
                Err(err) => {
                    warn!(provider = %provider.kind(), error = %err, "provider request failed");
                    return Err(LlmError::Request(err));
                }
            }
        }

        Err(LlmError::RateLimited {
            attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
            last_error: last_error.unwrap_or_else(|| {
                TransportError::RateLimited("no attempt was made".into())
            }),
        })
    }
}

/// The fixed question returned when no provider is configured.
///
/// # Errors
/// Never in practice; the constant question satisfies every invariant.
pub fn placeholder_questions() -> Result<Vec<Question>, LlmError> {
    let question = Question::new(
        QuestionId::positional(1),
        "Sample question because no LLM API key is configured.",
        ["Option A", "Option B", "Option C", "Option D"].map(String::from),
        0,
        "Pretend you read the document and recall the key idea.",
        "This is a placeholder. Configure an OpenRouter or OpenAI API key to generate questions from the document.",
    )?;
    Ok(vec![question])
}
