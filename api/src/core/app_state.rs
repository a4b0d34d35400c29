//! Shared state for all HTTP handlers, wired once at startup.

use std::sync::Arc;
use std::time::Instant;

use catalog_store::CatalogStore;
use chunk_store::{ChunkStore, ChunkStoreConfig};
use llm_service::LlmProfiles;
use prompt_store::PromptStore;
use qa_engine::{EngineConfig, QaEngine};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The question-answering pipeline.
    pub engine: Arc<QaEngine>,
    /// Relational stores (feedback, chat history).
    pub catalog: Arc<CatalogStore>,
    /// Vector store, used by the ingestion trigger.
    pub chunks: Arc<ChunkStore>,
    /// Shared LLM profiles (health endpoint, ingestion embeddings).
    pub llm: Arc<LlmProfiles>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Builds all services from environment variables and wires the engine.
    ///
    /// # Errors
    /// Fails when a required variable is missing or a backing service is
    /// misconfigured/unreachable.
    pub async fn from_env() -> Result<Self, AppError> {
        let llm = Arc::new(LlmProfiles::from_env()?);
        let chunks = Arc::new(ChunkStore::new(ChunkStoreConfig::from_env())?);

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| AppError::MissingEnv("DATABASE_URL"))?;
        let catalog = Arc::new(CatalogStore::connect(&database_url).await?);
        catalog.migrate().await?;

        let prompts = Arc::new(PromptStore::from_env());

        let engine = Arc::new(QaEngine::new(
            EngineConfig::from_env(),
            llm.clone(),
            llm.clone(),
            chunks.clone(),
            catalog.clone(),
            catalog.clone(),
            catalog.clone(),
            catalog.clone(),
            prompts,
        ));

        Ok(Self {
            engine,
            catalog,
            chunks,
            llm,
            started_at: Instant::now(),
        })
    }
}
