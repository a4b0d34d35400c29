//! POST /api/feedback — stores a thumbs-up/down with optional comment.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_tracing::RequestId,
};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub session_id: Uuid,
    #[serde(default)]
    pub message_id: Option<Uuid>,
    #[serde(default)]
    pub score: Option<i16>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub ok: bool,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Handler: POST /api/feedback
pub async fn feedback(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    Json(body): Json<FeedbackRequest>,
) -> AppResult<Json<FeedbackResponse>> {
    if let Some(score) = body.score {
        if !matches!(score, -1 | 0 | 1) {
            return Err(AppError::Unprocessable("score must be -1, 0, or 1".into()));
        }
    }

    let id = state
        .catalog
        .insert_feedback(
            body.session_id,
            body.message_id,
            body.score,
            body.comment.as_deref(),
        )
        .await?;

    Ok(Json(FeedbackResponse {
        ok: true,
        id,
        request_id: request_id.map(|Extension(id)| id.0),
    }))
}
