/// Represents the provider (backend) used for large language model inference.
///
/// Distinguishes between an OpenAI-compatible REST API and a local Ollama
/// runtime. Adding more providers later (e.g., Anthropic, Mistral) means
/// extending this enum and the client cache in `service_profiles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI-compatible chat/embeddings API.
    OpenAi,
    /// Local Ollama runtime for on-device inference.
    Ollama,
}
