//! Retrieval: similarity search returning normalized chunk hits.

use crate::config::ChunkStoreConfig;
use crate::errors::ChunkStoreError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::ChunkHit;

use tracing::{trace, warn};

/// Performs a similarity search given a ready query vector and maps payloads
/// into [`ChunkHit`] values.
///
/// Rows whose payload is missing `source_file` or `chunk_index` are dropped
/// with a warning; downstream context assembly only works with well-formed
/// provenance.
///
/// # Errors
/// Returns `ChunkStoreError::Qdrant` on client failures.
pub async fn search_chunks(
    cfg: &ChunkStoreConfig,
    client: &QdrantFacade,
    query_vector: Vec<f32>,
    top_k: u64,
) -> Result<Vec<ChunkHit>, ChunkStoreError> {
    trace!("retrieve::search_chunks top_k={top_k}");

    let raw = client
        .search(query_vector, top_k, /* with_payload = */ true, cfg.exact_search)
        .await?;

    let mut out = Vec::with_capacity(raw.len());
    for (score, payload) in raw {
        let source_file = payload.get("source_file").and_then(|v| v.as_str());
        let chunk_index = payload
            .get("chunk_index")
            .and_then(|v| v.as_i64())
            .and_then(|i| u32::try_from(i).ok());
        let content = payload
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        match (source_file, chunk_index) {
            (Some(sf), Some(ci)) => out.push(ChunkHit {
                source_file: sf.to_string(),
                chunk_index: ci,
                content: content.to_string(),
                similarity: score,
            }),
            _ => {
                warn!("dropping hit without source_file/chunk_index payload");
            }
        }
    }

    trace!("retrieve::search_chunks hits={}", out.len());
    Ok(out)
}
