use std::collections::HashSet;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use selection_pipeline::select_next;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct NextQuestionParams {
    pub category: String,
    pub previous_index: Option<usize>,
    #[serde(default)]
    pub asked_indices: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct NextQuestionResponse {
    pub index: usize,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub category: String,
}

/// Serve the next question for a category, avoiding repeats and
/// near-duplicates of the previous question. Session state (the asked set
/// and previous index) is owned by the caller and supplied per request.
pub async fn next_question(
    State(state): State<ApiState>,
    Json(params): Json<NextQuestionParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut asked: HashSet<usize> = params.asked_indices.iter().copied().collect();

    let index = select_next(
        &state.catalog,
        &params.category,
        params.previous_index,
        &mut asked,
        Some(state.embeddings.questions()),
    )?;

    let record = state.catalog.record(index).ok_or_else(|| {
        tracing::error!(index, "Selected index missing from catalog");
        ApiError::InternalError("Internal server error".to_string())
    })?;

    info!(
        category = %params.category,
        index,
        asked = asked.len(),
        "Serving next question"
    );

    let answer = state
        .config
        .include_answer_in_question_response
        .then(|| record.answer.clone());

    Ok(Json(NextQuestionResponse {
        index,
        question: record.question.clone(),
        answer,
        category: record.category.clone(),
    }))
}
