use api_state::ApiState;
use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use routes::{
    categories::get_categories, evaluate::evaluate_answer, liveness::live,
    question::next_question, readiness::ready,
};

pub mod api_state;
pub mod error;
mod routes;

/// Router for API functionality, version 1
pub fn api_routes_v1<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Probe endpoints (for k8s/systemd probes)
    let probes = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    // Interview endpoints. Candidate answers are free text, so the evaluate
    // body gets an explicit size cap.
    let interview = Router::new()
        .route("/categories", get(get_categories))
        .route("/question", post(next_question))
        .route(
            "/evaluate",
            post(evaluate_answer).layer(DefaultBodyLimit::max(
                app_state.config.max_request_body_bytes,
            )),
        );

    probes.merge(interview)
}
