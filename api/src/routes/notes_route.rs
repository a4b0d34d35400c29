//! GET /api/notes/download — engineering notes as a markdown attachment.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    middleware_layer::request_tracing::RequestId,
};

#[derive(Debug, Deserialize)]
pub struct NotesQuery {
    pub session_id: Uuid,
}

/// Handler: GET /api/notes/download?session_id=...
pub async fn download_notes(
    State(state): State<Arc<AppState>>,
    _request_id: Option<Extension<RequestId>>,
    Query(query): Query<NotesQuery>,
) -> AppResult<Response> {
    let md = state.engine.engineering_notes(query.session_id).await?;

    let filename = format!("engineering_notes_{}.md", query.session_id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        md,
    )
        .into_response())
}
