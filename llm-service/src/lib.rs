//! Shared LLM client layer: chat completions and embeddings.
//!
//! Two logical profiles are managed by [`service_profiles::LlmProfiles`]:
//! **chat** (answer generation, planning, validation) and **embedding**
//! (query/document vectors). Providers are pluggable; OpenAI-compatible
//! and Ollama backends are supported.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

pub use chat::{ChatMessage, Role};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::LlmError;
pub use service_profiles::LlmProfiles;
