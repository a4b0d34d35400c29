use std::{env, error::Error, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::middleware_layer::request_tracing::request_tracing;
use crate::routes::{
    ask::ask_route::ask,
    chats::chats_route::{
        create_chat, create_chat_message, delete_chat, list_chat_messages, list_chats,
    },
    feedback_route::feedback,
    health_route::{api_health, health},
    ingest_route::ingest_library,
    math::math_route::run_math,
    notes_route::download_notes,
};

pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS").expect("API_ADDRESS must be set in environment");

    let state = Arc::new(AppState::from_env().await?);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/health", get(api_health))
        .route("/api/ask", post(ask))
        .route("/api/feedback", post(feedback))
        .route("/api/math", post(run_math))
        .route("/api/notes/download", get(download_notes))
        .route("/api/ingest", post(ingest_library))
        .route("/api/chats", post(create_chat).get(list_chats))
        .route("/api/chats/{chat_id}", delete(delete_chat))
        .route(
            "/api/chats/{chat_id}/messages",
            get(list_chat_messages).post(create_chat_message),
        )
        .layer(middleware::from_fn(request_tracing))
        .with_state(state);

    info!("listening on {host_url}");

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url).await?;

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
