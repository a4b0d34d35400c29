use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("not found")]
    NotFound,

    // --- Downstream failures (details logged, not leaked) ---
    #[error("pipeline failure")]
    Engine(#[source] qa_engine::EngineError),

    #[error("storage failure")]
    Catalog(#[source] catalog_store::CatalogError),

    #[error("llm service failure")]
    Llm(#[source] llm_service::LlmError),

    #[error("chunk store failure")]
    Chunks(#[source] chunk_store::ChunkStoreError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::Engine(_)
            | AppError::Catalog(_)
            | AppError::Llm(_)
            | AppError::Chunks(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unprocessable(_) => "UNPROCESSABLE",
            AppError::NotFound => "NOT_FOUND",
            AppError::Engine(_) => "PIPELINE_ERROR",
            AppError::Catalog(_) => "STORAGE_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Chunks(_) => "CHUNK_STORE_ERROR",
        }
    }

    /// Message safe to surface to the caller. Internal failures collapse to
    /// a generic line; their detail only goes to the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Engine(_)
            | AppError::Catalog(_)
            | AppError::Llm(_)
            | AppError::Chunks(_) => "internal failure, see server logs".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            // Full chain to the logs; generic message to the client.
            error!(error = ?self, "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<qa_engine::EngineError> for AppError {
    fn from(err: qa_engine::EngineError) -> Self {
        // An unknown mode surfaces as a missing prompt template; that is a
        // caller mistake, not a server failure.
        match err {
            qa_engine::EngineError::Prompt(prompt_store::PromptError::NotFound(_)) => {
                AppError::BadRequest("unknown mode".into())
            }
            other => AppError::Engine(other),
        }
    }
}

impl From<catalog_store::CatalogError> for AppError {
    fn from(err: catalog_store::CatalogError) -> Self {
        match err {
            catalog_store::CatalogError::InvalidRole(role) => {
                AppError::BadRequest(format!("invalid role: {role}"))
            }
            other => AppError::Catalog(other),
        }
    }
}

impl From<llm_service::LlmError> for AppError {
    fn from(err: llm_service::LlmError) -> Self {
        AppError::Llm(err)
    }
}

impl From<chunk_store::ChunkStoreError> for AppError {
    fn from(err: chunk_store::ChunkStoreError) -> Self {
        AppError::Chunks(err)
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
