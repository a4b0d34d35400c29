//! POST /api/ask — answers a question through the full pipeline.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};

use qa_engine::AnswerRequest;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_tracing::RequestId,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /api/ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/ask \
///   -H 'content-type: application/json' \
///   -d '{"mode":"mode_1","message":"What fit should I use for a press-fit dowel?"}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    Json(body): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let outcome = state
        .engine
        .answer(AnswerRequest {
            mode: body.mode.as_str().to_string(),
            message: body.message,
            session_id: body.session_id,
            clarification: body.clarification,
            tester_label: body.tester_label,
        })
        .await?;

    Ok(Json(AskResponse {
        answer: outcome.answer,
        citations: outcome.citations,
        debug: outcome.debug,
        request_id: request_id.map(|Extension(id)| id.0),
    }))
}
