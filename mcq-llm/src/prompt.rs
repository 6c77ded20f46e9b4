//! Prompt templates for question generation.
//!
//! The built-in templates are compiled in. A deployment may replace them
//! with a TOML file:
//!
//! ```toml
//! [prompt]
//! version = "2"
//! temperature = 0.2      # optional
//! max_tokens = 1500      # optional
//! system = "..."
//! user = "... {content} ... {max_questions} ..."
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::LlmError;

/// System prompt: persona and hard output rules.
pub const MCQ_SYSTEM: &str = r"You are a teaching assistant. Given input text, create clear multiple-choice questions.
Each question must have 4 options, exactly one correct answer, a short hint, and a brief explanation.
Respond ONLY with JSON that follows the provided schema.";

/// User prompt: source text, requested count and the exact JSON shape.
pub const MCQ_USER: &str = r#"Text:
{content}

Generate up to {max_questions} multiple-choice questions that test understanding of this text.
Respond in exactly this JSON structure:
{
  "questions": [
    {
      "id": "q1",
      "question": "string",
      "options": ["string", "string", "string", "string"],
      "correct_option_index": 1,
      "hint": "string",
      "explanation": "string"
    }
  ]
}"#;

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value, in the order given.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Inner `[prompt]` section of a TOML file.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: PromptTemplate,
}

/// A ready-to-render pair of prompt templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromptTemplate {
    /// Prompt version string.
    pub version: String,
    /// Overrides the configured temperature.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Overrides the configured output token limit.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// System prompt.
    pub system: String,
    /// User prompt with `{content}` and `{max_questions}` placeholders.
    pub user: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplate {
    /// The compiled-in templates.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: "builtin".into(),
            temperature: None,
            max_tokens: None,
            system: MCQ_SYSTEM.into(),
            user: MCQ_USER.into(),
        }
    }

    /// Parse a TOML prompt file's contents.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the TOML is invalid or the user
    /// template lacks the `{content}` placeholder.
    pub fn from_toml(toml_str: &str) -> Result<Self, LlmError> {
        let parsed: TomlPromptFile = toml::from_str(toml_str)
            .map_err(|e| LlmError::ConfigError(format!("invalid prompt file: {e}")))?;
        let template = parsed.prompt;
        if !template.user.contains("{content}") {
            return Err(LlmError::ConfigError(
                "prompt user template must contain {content}".into(),
            ));
        }
        Ok(template)
    }

    /// Load a TOML prompt file.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LlmError::ConfigError(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Render `(system, user)` for a source text and question count.
    ///
    /// `{max_questions}` is substituted before `{content}` so braces inside
    /// the document text are never interpreted.
    #[must_use]
    pub fn render(&self, content: &str, max_questions: usize) -> (String, String) {
        let count = max_questions.to_string();
        let vars = [("max_questions", count.as_str()), ("content", content)];
        (
            render_template(&self.system, &vars),
            render_template(&self.user, &vars),
        )
    }
}
