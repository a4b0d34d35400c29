use serde::{Deserialize, Serialize};
use uuid::Uuid;

use qa_engine::{Citation, DebugMeta};

/// Answering modes, each backed by its own system prompt template.
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum Mode {
    /// Guidance (sense-making).
    #[serde(rename = "mode_1")]
    Mode1,
    /// Verification (technical validation).
    #[serde(rename = "mode_2")]
    Mode2,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Mode1 => "mode_1",
            Mode::Mode2 => "mode_2",
        }
    }
}

/// Request payload for `POST /api/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub mode: Mode,
    /// Natural language question (must be non-empty).
    pub message: String,
    /// Session to attach to; a fresh one is created when omitted.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// Answer to a previously surfaced clarifying question.
    #[serde(default)]
    pub clarification: Option<String>,
    /// Optional tester label stored on the session row.
    #[serde(default)]
    pub tester_label: Option<String>,
}

/// Response payload for `POST /api/ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub debug: DebugMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
