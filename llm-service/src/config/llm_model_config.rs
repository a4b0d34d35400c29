use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM profile (chat or embedding).
///
/// Sampling temperature is deliberately *not* part of the config: the
/// question-answering pipeline fixes it per call (planner/validator at 0,
/// draft generation at 0.2), so it travels with the request instead.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (OpenAI-compatible or Ollama).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-4o-mini"`, `"qwen3:14b"`).
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
