//! Chunk storage for retrieval-augmented answering.
//!
//! Ingests extracted document text into Qdrant (chunk → embed → upsert) and
//! serves similarity searches returning `{source_file, chunk_index, content,
//! similarity}` hits ordered by descending similarity.

pub mod chunking;
pub mod config;
pub mod embed;
pub mod errors;
pub mod ingest;
pub mod qdrant_facade;
pub mod record;
pub mod retrieve;

pub use config::{ChunkStoreConfig, DistanceKind, VectorSpace};
pub use errors::ChunkStoreError;
pub use record::ChunkHit;

use std::path::Path;

use embed::EmbeddingsProvider;
use qdrant_facade::QdrantFacade;

/// Facade combining config and client for the common operations.
pub struct ChunkStore {
    cfg: ChunkStoreConfig,
    client: QdrantFacade,
}

impl ChunkStore {
    /// Creates a store (validates config, builds the Qdrant client).
    ///
    /// # Errors
    /// Returns [`ChunkStoreError::Config`] or [`ChunkStoreError::Qdrant`].
    pub fn new(cfg: ChunkStoreConfig) -> Result<Self, ChunkStoreError> {
        let client = QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Current configuration.
    pub fn config(&self) -> &ChunkStoreConfig {
        &self.cfg
    }

    /// Similarity search with a ready query vector; hits ordered by
    /// descending similarity.
    ///
    /// # Errors
    /// Returns [`ChunkStoreError::Qdrant`] on client failures.
    pub async fn search(
        &self,
        query_vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ChunkHit>, ChunkStoreError> {
        retrieve::search_chunks(&self.cfg, &self.client, query_vector, top_k).await
    }

    /// Ingests every document under `library_dir`; see [`ingest::ingest_library`].
    ///
    /// # Errors
    /// Propagates walk/read, embedding, and Qdrant failures.
    pub async fn ingest_library(
        &self,
        library_dir: impl AsRef<Path>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<u64, ChunkStoreError> {
        ingest::ingest_library(&self.cfg, &self.client, library_dir, provider).await
    }
}
