//! Chat-history CRUD: create/list chats, list/append messages, soft delete.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use catalog_store::{ChatRow, MessageRole};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chats::chat_types::{
        ChatDto, ChatMessageDto, ChatOwnerQuery, CreateChatRequest, CreateMessageRequest,
    },
};

#[derive(Debug, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<ChatDto>,
}

async fn get_chat_or_404(
    state: &AppState,
    chat_id: Uuid,
    user_id: &str,
) -> AppResult<ChatRow> {
    state
        .catalog
        .get_chat(chat_id, user_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Handler: POST /api/chats
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateChatRequest>,
) -> AppResult<Json<Value>> {
    if body.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".into()));
    }
    let chat = state
        .catalog
        .create_chat(&body.user_id, body.title.as_deref())
        .await?;
    Ok(Json(json!({ "chat": ChatDto::from(chat) })))
}

/// Handler: GET /api/chats?user_id=...
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatOwnerQuery>,
) -> AppResult<Json<ChatListResponse>> {
    let chats = state.catalog.list_chats(&query.user_id).await?;
    Ok(Json(ChatListResponse {
        chats: chats.into_iter().map(ChatDto::from).collect(),
    }))
}

/// Handler: DELETE /api/chats/{chat_id}?user_id=...
pub async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<Uuid>,
    Query(query): Query<ChatOwnerQuery>,
) -> AppResult<Json<Value>> {
    get_chat_or_404(&state, chat_id, &query.user_id).await?;
    state.catalog.soft_delete_chat(chat_id).await?;
    Ok(Json(json!({ "ok": true, "chat_id": chat_id })))
}

/// Handler: GET /api/chats/{chat_id}/messages?user_id=...
pub async fn list_chat_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<Uuid>,
    Query(query): Query<ChatOwnerQuery>,
) -> AppResult<Json<Value>> {
    let chat = get_chat_or_404(&state, chat_id, &query.user_id).await?;
    let messages = state.catalog.list_chat_messages(chat_id).await?;
    Ok(Json(json!({
        "chat": ChatDto::from(chat),
        "messages": messages.into_iter().map(ChatMessageDto::from).collect::<Vec<_>>(),
    })))
}

/// Handler: POST /api/chats/{chat_id}/messages
pub async fn create_chat_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<Uuid>,
    Json(body): Json<CreateMessageRequest>,
) -> AppResult<Json<Value>> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("content must not be empty".into()));
    }
    let role = MessageRole::parse(&body.role)?;
    let chat = get_chat_or_404(&state, chat_id, &body.user_id).await?;

    let message = state
        .catalog
        .append_chat_message(&chat, role, &body.content)
        .await?;
    Ok(Json(json!({ "message": ChatMessageDto::from(message) })))
}
