use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Category names in question-bank order.
pub async fn get_categories(State(state): State<ApiState>) -> impl IntoResponse {
    Json(json!({ "categories": state.catalog.categories() }))
}
