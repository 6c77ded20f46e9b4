//! Wire transport for OpenAI-compatible chat completion APIs.
//!
//! Both supported providers speak the same protocol, so one HTTP
//! implementation serves both; they differ only in [`Endpoint`] data.
//! [`ChatTransport`] is the seam the generation client is generic over.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::types::{LlmRequest, LlmResponse};

/// Where and as whom a completion request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// API base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
}

impl Endpoint {
    /// Full chat-completions URL.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Sends one completion request and returns the raw assistant text.
pub trait ChatTransport: Send + Sync {
    /// Perform a single attempt. Implementations must not retry.
    fn complete(
        &self,
        endpoint: &Endpoint,
        request: &LlmRequest,
    ) -> impl Future<Output = Result<LlmResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with its own connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatTransport for HttpTransport {
    async fn complete(
        &self,
        endpoint: &Endpoint,
        request: &LlmRequest,
    ) -> Result<LlmResponse, TransportError> {
        let url = endpoint.completions_url();
        let mut body = json!({
            "model": endpoint.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(&endpoint.api_key)
            .json(&body)
            .timeout(Duration::from_millis(request.timeout_ms));
        for (name, value) in &endpoint.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(url = %url, model = %endpoint.model, "sending chat completion");
        let start = Instant::now();
        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, request.timeout_ms))?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::RateLimited(format!("HTTP 429: {body}")));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion returned error status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| TransportError::Decode("response has no message content".into()))?
            .to_string();

        let tokens_generated = json["usage"]["completion_tokens"]
            .as_u64()
            .and_then(|t| u32::try_from(t).ok())
            .unwrap_or(0);

        Ok(LlmResponse {
            text,
            tokens_generated,
            latency_ms,
            model: json["model"]
                .as_str()
                .unwrap_or(&endpoint.model)
                .to_string(),
        })
    }
}
