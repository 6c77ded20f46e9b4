//! Layered settings loading.
//!
//! Precedence, highest first:
//! 1. `mcq.local.toml`
//! 2. `mcq.toml`
//! 3. environment variables (only for keys neither file sets)
//! 4. built-in defaults
//!
//! Missing files are skipped. A file that exists but cannot be read or
//! parsed is an error.

use std::path::Path;

use mcq_core::config::McqConfig;
use tracing::debug;

use crate::error::{Result, ServiceError};

/// Base settings file name.
pub const BASE_FILE: &str = "mcq.toml";

/// Untracked per-machine overrides.
pub const LOCAL_FILE: &str = "mcq.local.toml";

#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Text,
    Integer,
}

/// Environment variable, config key path and value type.
const ENV_KEYS: &[(&str, &[&str], ValueKind)] = &[
    ("LLM_PROVIDER", &["llm", "provider"], ValueKind::Text),
    ("OPENAI_API_KEY", &["llm", "openai", "api_key"], ValueKind::Text),
    ("OPENAI_MODEL", &["llm", "openai", "model"], ValueKind::Text),
    ("OPENROUTER_API_KEY", &["llm", "openrouter", "api_key"], ValueKind::Text),
    ("OPENROUTER_BASE_URL", &["llm", "openrouter", "base_url"], ValueKind::Text),
    ("OPENROUTER_MODEL", &["llm", "openrouter", "model"], ValueKind::Text),
    ("OPENROUTER_SITE", &["llm", "openrouter", "site"], ValueKind::Text),
    ("OPENROUTER_TITLE", &["llm", "openrouter", "title"], ValueKind::Text),
    ("MAX_PDF_PAGES", &["quiz", "max_pages"], ValueKind::Integer),
    ("MAX_QUESTIONS", &["quiz", "max_questions"], ValueKind::Integer),
];

/// Load settings from `dir` and the process environment.
///
/// # Errors
/// Returns [`ServiceError::Config`] if a settings file is unreadable or
/// invalid, or an integer variable does not parse.
pub fn load(dir: &Path) -> Result<McqConfig> {
    load_with_env(dir, |key| std::env::var(key).ok())
}

/// Load settings from `dir`, resolving environment variables through `env`.
///
/// # Errors
/// See [`load`].
pub fn load_with_env(dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<McqConfig> {
    let mut merged = toml::Table::new();
    for name in [BASE_FILE, LOCAL_FILE] {
        if let Some(layer) = read_layer(&dir.join(name))? {
            merge(&mut merged, layer);
        }
    }

    for (var, path, kind) in ENV_KEYS {
        let Some(raw) = env(var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let value = match kind {
            ValueKind::Text => toml::Value::String(raw.trim().to_string()),
            ValueKind::Integer => raw.trim().parse::<i64>().map(toml::Value::Integer).map_err(|_| {
                ServiceError::Config(format!("{var} must be an integer, got '{raw}'"))
            })?,
        };
        if insert_if_absent(&mut merged, path, value) {
            debug!(var, "setting taken from environment");
        }
    }

    toml::Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| ServiceError::Config(e.to_string()))
}

fn read_layer(path: &Path) -> Result<Option<toml::Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ServiceError::Config(format!("failed to read {}: {e}", path.display())))?;
    // Each layer must be a valid config on its own so errors name the file.
    McqConfig::from_toml(&content).map_err(|e| invalid_layer(path, &e))?;
    let table = toml::from_str::<toml::Table>(&content).map_err(|e| invalid_layer(path, &e))?;
    debug!(path = %path.display(), "loaded settings layer");
    Ok(Some(table))
}

fn invalid_layer(path: &Path, err: &dyn std::fmt::Display) -> ServiceError {
    ServiceError::Config(format!("invalid {}: {err}", path.display()))
}

/// Deep-merge `overlay` into `base`; overlay scalars win.
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

/// Set `path` to `value` unless a file already set it.
fn insert_if_absent(root: &mut toml::Table, path: &[&str], value: toml::Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };
    let mut table = root;
    for key in parents {
        table = match table
            .entry((*key).to_string())
            .or_insert(toml::Value::Table(toml::Table::new()))
        {
            toml::Value::Table(inner) => inner,
            _ => return false,
        };
    }
    if table.contains_key(*last) {
        return false;
    }
    table.insert((*last).to_string(), value);
    true
}
