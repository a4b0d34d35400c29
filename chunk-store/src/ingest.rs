//! Library ingestion pipeline: walk extracted-text documents → chunk → embed → upsert.
//!
//! The walk consumes already-extracted text (`.txt`/`.md`) under a library
//! directory; `policies/` and `references/` subtrees are skipped so license
//! and reference material never enters the retrieval corpus. Point ids are
//! deterministic (UUID v5 of `source_file:chunk_index`), which makes re-runs
//! idempotent upserts instead of duplicate inserts.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::Payload;
use qdrant_client::qdrant::PointStruct;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chunking::{CHUNK_CHARS, CHUNK_OVERLAP, chunk_text};
use crate::config::{ChunkStoreConfig, VectorSpace};
use crate::embed::EmbeddingsProvider;
use crate::errors::ChunkStoreError;
use crate::qdrant_facade::QdrantFacade;

/// Directory names excluded from ingestion (license and reference material).
const EXCLUDED_DIR_NAMES: [&str; 2] = ["policies", "references"];

/// Extensions accepted as extracted document text.
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Ingests every document under `library_dir` into the configured collection.
///
/// Returns the number of points upserted.
///
/// # Errors
/// I/O failures while walking/reading, embedding provider failures, and
/// Qdrant errors all abort the run.
pub async fn ingest_library(
    cfg: &ChunkStoreConfig,
    client: &QdrantFacade,
    library_dir: impl AsRef<Path>,
    provider: &dyn EmbeddingsProvider,
) -> Result<u64, ChunkStoreError> {
    let docs = discover_documents(library_dir.as_ref())?;
    info!(
        "Found {} documents under {:?} (excluding {:?})",
        docs.len(),
        library_dir.as_ref(),
        EXCLUDED_DIR_NAMES
    );
    if docs.is_empty() {
        return Ok(0);
    }

    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut collection_ready = false;
    let mut total: u64 = 0;
    let batch_size = cfg.upsert_batch.max(1);

    for (source_id, path) in docs {
        pb.set_message(source_id.clone());
        let text = fs::read_to_string(&path)?;
        let chunks = chunk_text(&text, CHUNK_CHARS, CHUNK_OVERLAP);
        debug!("{}: {} chunks", source_id, chunks.len());

        let mut points: Vec<PointStruct> = Vec::with_capacity(batch_size);
        for (idx, content) in chunks.iter().enumerate() {
            let vector = provider.embed(content).await?;

            if let Some(want) = cfg.embedding_dim {
                if vector.len() != want {
                    return Err(ChunkStoreError::VectorSizeMismatch {
                        got: vector.len(),
                        want,
                    });
                }
            }
            if !collection_ready {
                client
                    .ensure_collection(&VectorSpace {
                        size: cfg.embedding_dim.unwrap_or(vector.len()),
                        distance: cfg.distance,
                    })
                    .await?;
                collection_ready = true;
            }

            points.push(build_point(&source_id, idx as u32, content, vector)?);
            if points.len() >= batch_size {
                total += client.upsert_points(std::mem::take(&mut points)).await?;
            }
        }
        if !points.is_empty() {
            total += client.upsert_points(points).await?;
        }
        pb.inc(1);
    }

    pb.finish_with_message("ingest complete");
    info!("Ingested {} chunks", total);
    Ok(total)
}

/// Deterministic point id for a chunk: UUID v5 over `source_file:chunk_index`.
pub fn stable_point_id(source_file: &str, chunk_index: u32) -> Uuid {
    Uuid::new_v5(
        &Uuid::NAMESPACE_URL,
        format!("{source_file}:{chunk_index}").as_bytes(),
    )
}

fn build_point(
    source_file: &str,
    chunk_index: u32,
    content: &str,
    vector: Vec<f32>,
) -> Result<PointStruct, ChunkStoreError> {
    let payload = Payload::try_from(json!({
        "source_file": source_file,
        "chunk_index": chunk_index as i64,
        "content": content,
    }))
    .map_err(|e| ChunkStoreError::Qdrant(e.to_string()))?;

    Ok(PointStruct::new(
        stable_point_id(source_file, chunk_index).to_string(),
        vector,
        payload,
    ))
}

/// Walks `root` for document text files, skipping excluded subtrees.
///
/// Returns `(source_id, path)` pairs where `source_id` is the path relative
/// to `root`, sorted for deterministic processing order.
fn discover_documents(root: &Path) -> Result<Vec<(String, PathBuf)>, ChunkStoreError> {
    fn visit(
        dir: &Path,
        root: &Path,
        out: &mut Vec<(String, PathBuf)>,
    ) -> Result<(), std::io::Error> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type()?.is_dir() {
                if EXCLUDED_DIR_NAMES.contains(&name.as_str()) {
                    continue;
                }
                visit(&path, root, out)?;
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| TEXT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false)
            {
                let source_id = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                out.push((source_id, path));
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    visit(root, root, &mut out)?;
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_point_id_is_deterministic() {
        let a = stable_point_id("docs/a.txt", 0);
        let b = stable_point_id("docs/a.txt", 0);
        let c = stable_point_id("docs/a.txt", 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
