//! Runtime and collection configuration.

use crate::errors::ChunkStoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for chunk ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct ChunkStoreConfig {
    /// Qdrant HTTP endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimensionality, if known up front.
    pub embedding_dim: Option<usize>,
}

impl ChunkStoreConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            embedding_dim: None,
        }
    }

    /// Builds a config from environment variables with defaults.
    ///
    /// - `QDRANT_URL`        (default `http://127.0.0.1:6334`)
    /// - `QDRANT_API_KEY`    (optional)
    /// - `QDRANT_COLLECTION` (default `doc_chunks`)
    /// - `QDRANT_BATCH_SIZE` (default 256)
    /// - `QDRANT_EXACT_SEARCH` (default false)
    /// - `EMBEDDING_DIM`     (optional)
    pub fn from_env() -> Self {
        let env = |k: &str, dflt: &str| std::env::var(k).unwrap_or_else(|_| dflt.to_string());

        Self {
            qdrant_url: env("QDRANT_URL", "http://127.0.0.1:6334"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: env("QDRANT_COLLECTION", "doc_chunks"),
            distance: DistanceKind::Cosine,
            upsert_batch: std::env::var("QDRANT_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(256),
            exact_search: env("QDRANT_EXACT_SEARCH", "false") == "true",
            embedding_dim: std::env::var("EMBEDDING_DIM")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), ChunkStoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(ChunkStoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(ChunkStoreError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(ChunkStoreError::Config("upsert_batch must be > 0".into()));
        }
        Ok(())
    }
}
