//! Health endpoints: a bare liveness probe and a richer status report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

const SERVICE_NAME: &str = "me-assist";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiHealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,
    pub uptime_seconds: f64,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

/// Handler: GET /api/health
pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<ApiHealthResponse> {
    Json(ApiHealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        git_sha: get_git_sha(Path::new(".")),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Resolves the current commit SHA from `.git/HEAD`, following a symbolic
/// ref through loose and packed refs. Best effort: any miss returns `None`.
fn get_git_sha(project_root: &Path) -> Option<String> {
    let git_dir = project_root.join(".git");
    let head = std::fs::read_to_string(git_dir.join("HEAD")).ok()?;
    let head = head.trim();

    let Some(reference) = head.strip_prefix("ref:") else {
        return (!head.is_empty()).then(|| head.to_string());
    };
    let reference = reference.trim();

    let ref_path: PathBuf = git_dir.join(reference);
    if let Ok(sha) = std::fs::read_to_string(&ref_path) {
        let sha = sha.trim();
        if !sha.is_empty() {
            return Some(sha.to_string());
        }
    }

    // Fall back to packed-refs.
    let packed = std::fs::read_to_string(git_dir.join("packed-refs")).ok()?;
    for line in packed.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('^') {
            continue;
        }
        if let Some((sha, name)) = line.split_once(' ') {
            if name == reference {
                return Some(sha.to_string());
            }
        }
    }
    None
}
