//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::state::AppState;

/// POST /api/v1/evaluate (also mounted at POST /evaluate)
///
/// Judges `profile_text` against `rules` and returns `{ decision, reasoning }`.
/// Body shape errors (missing fields, `rules` not a list of strings) come back
/// as VALIDATION_ERROR rather than the framework's plain-text rejection.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let result = state.evaluator.evaluate(&request).await?;

    Ok(Json(result))
}
