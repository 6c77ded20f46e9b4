//! # mcq-service — Quiz Service for Document-Generated MCQs
//!
//! Wires the quiz store from `mcq-core` and the generator from `mcq-llm`
//! into the inbound operations, and carries the process-level concerns.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │            mcq-quiz (CLI)                 │
//! │  ┌─────────────────────────────────────┐  │
//! │  │           QuizService               │  │
//! │  │  ┌──────────────┐ ┌──────────────┐  │  │
//! │  │  │  QuizStore   │ │  Generation  │  │  │
//! │  │  │  (mcq-core)  │ │  (mcq-llm)   │  │  │
//! │  │  └──────────────┘ └──────────────┘  │  │
//! │  └─────────────────────────────────────┘  │
//! │   settings · telemetry · document         │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `service` — [`QuizService`]: create, view and answer quizzes
//! - `settings` — layered `mcq.toml` / `mcq.local.toml` / environment loading
//! - `document` — page text assembly
//! - `telemetry` — tracing subscriber setup

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod error;
pub mod service;
pub mod settings;
pub mod telemetry;

pub use error::ServiceError;
pub use service::{QuizService, UploadSummary};
