//! # mcq-llm — Question Generation for MCQ Quizzes
//!
//! Turns a document's text into validated multiple-choice questions through
//! an OpenAI-compatible chat completion API:
//!   - **OpenRouter** (default preference)
//!   - **OpenAI**
//!   - **Placeholder** when no credential is configured (no network call)
//!
//! Every generation call goes through [`GenerationClient`], ensuring:
//!   - Provider selection by configured credentials only
//!   - JSON-object output with strict schema validation
//!   - Retry with fixed backoff (0s, 2s, 4s) on rate limiting only
//!   - Classified errors ([`LlmError`])

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod transport;
pub mod types;

pub use client::{GenerationClient, Provider, ProviderKind, RetryPolicy, placeholder_questions, select_provider};
pub use error::{LlmError, TransportError};
pub use transport::{ChatTransport, Endpoint, HttpTransport};
pub use types::{LlmRequest, LlmResponse};
