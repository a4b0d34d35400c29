//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by role:
//!
//! - **Chat**      → completion model used for planning, answering, validation
//! - **Embedding** → embedding generator used for retrieval queries
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`        = provider kind (`openai` (default) or `ollama`)
//! - `LLM_MAX_TOKENS`  = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`= optional per-request timeout (u32, default 60)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  = API key (mandatory)
//! - `OPENAI_BASE_URL` = endpoint base (default `https://api.openai.com`)
//! - `LLM_MODEL`       = chat model (default `gpt-4o-mini`)
//! - `EMBED_MODEL`     = embedding model (default `text-embedding-3-small`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = chat model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, LlmError, env_opt_u32, must_env},
};

/// Resolves the provider kind from `LLM_KIND` (defaults to OpenAI).
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for an unknown value.
pub fn provider_kind() -> Result<LlmProvider, LlmError> {
    match std::env::var("LLM_KIND")
        .unwrap_or_else(|_| "openai".into())
        .to_lowercase()
        .as_str()
    {
        "openai" => Ok(LlmProvider::OpenAi),
        "ollama" => Ok(LlmProvider::Ollama),
        other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, LlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(LlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

fn timeout_secs() -> Result<Option<u64>, LlmError> {
    Ok(env_opt_u32("LLM_TIMEOUT_SECS")?
        .map(u64::from)
        .or(Some(60)))
}

/// Constructs the **chat** profile config for the configured provider.
///
/// # Errors
/// Propagates missing/invalid environment variables.
pub fn config_chat() -> Result<LlmModelConfig, LlmError> {
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    match provider_kind()? {
        LlmProvider::OpenAi => Ok(LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            endpoint: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens,
            top_p: None,
            timeout_secs: timeout_secs()?,
        }),
        LlmProvider::Ollama => Ok(LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_env("OLLAMA_MODEL")?,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens,
            top_p: None,
            timeout_secs: timeout_secs()?,
        }),
    }
}

/// Constructs the **embedding** profile config for the configured provider.
///
/// # Errors
/// Propagates missing/invalid environment variables.
pub fn config_embedding() -> Result<LlmModelConfig, LlmError> {
    match provider_kind()? {
        LlmProvider::OpenAi => Ok(LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: std::env::var("EMBED_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".into()),
            endpoint: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens: None,
            top_p: None,
            timeout_secs: timeout_secs()?,
        }),
        LlmProvider::Ollama => Ok(LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_env("EMBEDDING_MODEL")?,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens: None,
            top_p: None,
            timeout_secs: timeout_secs()?,
        }),
    }
}
