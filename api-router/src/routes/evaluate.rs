use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct EvaluateParams {
    pub candidate_answer: String,
    pub expected_answer: String,
    /// When present, selects the precomputed answer embedding for this
    /// catalog entry; otherwise the expected answer text is embedded on the
    /// fly.
    pub question_index: Option<usize>,
}

/// Score a candidate answer and generate narrative feedback. Returns both
/// together, or an error; never a partial result.
pub async fn evaluate_answer(
    State(state): State<ApiState>,
    Json(params): Json<EvaluateParams>,
) -> Result<impl IntoResponse, ApiError> {
    if params.candidate_answer.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "candidate_answer must not be empty".to_string(),
        ));
    }
    if params.expected_answer.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "expected_answer must not be empty".to_string(),
        ));
    }

    let expected_embedding = match params.question_index {
        Some(index) => Some(state.embeddings.answer(index).ok_or_else(|| {
            ApiError::ValidationError(format!("question_index {index} is out of range"))
        })?),
        None => None,
    };

    let result = state
        .evaluator
        .evaluate(
            &params.candidate_answer,
            &params.expected_answer,
            expected_embedding,
        )
        .await?;

    info!(
        question_index = ?params.question_index,
        similarity = result.similarity,
        "Evaluated candidate answer"
    );

    Ok(Json(result))
}
