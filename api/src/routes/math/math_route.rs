//! POST /api/math — numeric solve/simplify helper.

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error_handler::{AppError, AppResult},
    middleware_layer::request_tracing::RequestId,
    routes::math::math_engine,
};

#[derive(Debug, Deserialize)]
pub struct MathRequest {
    /// "solve" or "simplify".
    pub task: String,
    pub expr: String,
    #[serde(default = "default_var")]
    pub var: String,
}

fn default_var() -> String {
    "x".to_string()
}

#[derive(Debug, Serialize)]
pub struct MathResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Handler: POST /api/math
///
/// Math errors (bad expression, non-linear input) come back as a payload
/// field rather than an HTTP failure; only an invalid task is a 400.
pub async fn run_math(
    request_id: Option<Extension<RequestId>>,
    Json(body): Json<MathRequest>,
) -> AppResult<Json<MathResponse>> {
    let request_id = request_id.map(|Extension(id)| id.0);

    match body.task.as_str() {
        "solve" => Ok(Json(match math_engine::solve_linear(&body.expr, &body.var) {
            Ok(root) => MathResponse {
                result: None,
                solutions: Some(vec![root]),
                error: None,
                request_id,
            },
            Err(e) => MathResponse {
                result: None,
                solutions: None,
                error: Some(e.to_string()),
                request_id,
            },
        })),
        "simplify" => Ok(Json(match math_engine::evaluate(&body.expr) {
            Ok(value) => MathResponse {
                result: Some(value),
                solutions: None,
                error: None,
                request_id,
            },
            Err(e) => MathResponse {
                result: None,
                solutions: None,
                error: Some(e.to_string()),
                request_id,
            },
        })),
        other => Err(AppError::BadRequest(format!("invalid math task: {other}"))),
    }
}
