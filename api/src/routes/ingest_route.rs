//! POST /api/ingest — walks the document library into the vector store.

use std::sync::Arc;

use axum::{Json, extract::State};
use chunk_store::embed::profiles::ProfilesEmbedder;
use serde::{Deserialize, Serialize};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

#[derive(Debug, Deserialize, Default)]
pub struct IngestRequest {
    /// Library directory override; `LIBRARY_DIR` when omitted.
    #[serde(default)]
    pub library_dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ingested: u64,
}

/// Handler: POST /api/ingest
///
/// Runs the full chunk → embed → upsert pipeline synchronously and reports
/// the number of points written.
pub async fn ingest_library(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IngestRequest>,
) -> AppResult<Json<IngestResponse>> {
    let library_dir = match body.library_dir {
        Some(dir) => dir,
        None => std::env::var("LIBRARY_DIR").map_err(|_| AppError::MissingEnv("LIBRARY_DIR"))?,
    };

    let embedder = ProfilesEmbedder::new(state.llm.clone());
    let ingested = state.chunks.ingest_library(&library_dir, &embedder).await?;

    Ok(Json(IngestResponse { ingested }))
}
