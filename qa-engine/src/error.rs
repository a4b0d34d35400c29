//! Typed error for the qa-engine crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Errors from the LLM service (completion or embedding calls).
    #[error("LLM error: {0}")]
    Llm(#[from] llm_service::LlmError),

    /// Errors from the chunk store (similarity search).
    #[error("chunk store error: {0}")]
    Chunks(#[from] chunk_store::ChunkStoreError),

    /// Errors from the relational catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] catalog_store::CatalogError),

    /// Errors loading prompt templates.
    #[error("prompt error: {0}")]
    Prompt(#[from] prompt_store::PromptError),
}
