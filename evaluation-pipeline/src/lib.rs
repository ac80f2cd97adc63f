pub mod feedback;
pub mod similarity;

use std::sync::Arc;

use async_openai::{config::OpenAIConfig, Client};
use serde::Serialize;
use tracing::instrument;

use common::error::AppError;
use similarity::SimilarityStrategy;

/// Ephemeral result of one answer evaluation; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub similarity: f32,
    pub feedback: String,
}

/// Scores a candidate answer against the expected answer and narrates the
/// verdict. The similarity strategy is injected; feedback always goes
/// through the text-generation model.
pub struct Evaluator {
    similarity: Box<dyn SimilarityStrategy>,
    openai_client: Arc<Client<OpenAIConfig>>,
    chat_model: String,
}

impl Evaluator {
    pub fn new(
        similarity: Box<dyn SimilarityStrategy>,
        openai_client: Arc<Client<OpenAIConfig>>,
        chat_model: String,
    ) -> Self {
        Self {
            similarity,
            openai_client,
            chat_model,
        }
    }

    /// Score the candidate and generate feedback.
    ///
    /// Similarity runs first: a similarity-service failure short-circuits
    /// the whole evaluation and no feedback call is made. A low score does
    /// not: both results are produced for every successful request.
    #[instrument(skip_all)]
    pub async fn evaluate(
        &self,
        candidate: &str,
        expected: &str,
        expected_embedding: Option<&[f32]>,
    ) -> Result<EvaluationResult, AppError> {
        let similarity = self
            .similarity
            .score(candidate, expected, expected_embedding)
            .await?;

        let feedback = feedback::generate_feedback(
            &self.openai_client,
            &self.chat_model,
            candidate,
            expected,
        )
        .await?;

        Ok(EvaluationResult {
            similarity,
            feedback,
        })
    }
}
