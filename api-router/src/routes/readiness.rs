use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness probe: the catalog and embedding cache are built before the
/// router starts serving, so this reports their shape for operators.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "checks": {
                "questions": state.catalog.len(),
                "categories": state.catalog.categories().len(),
                "embedding_dimension": state.embeddings.dimension()
            }
        })),
    )
}
