use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use common::{
    error::AppError,
    utils::config::AppConfig,
    utils::embedding::EmbeddingProvider,
};
use selection_pipeline::scoring::cosine_similarity;

/// How a candidate answer is scored against the expected answer. Both
/// deployments' behaviors are first-class: pick one by configuration.
#[async_trait]
pub trait SimilarityStrategy: Send + Sync {
    async fn score(
        &self,
        candidate: &str,
        expected: &str,
        expected_embedding: Option<&[f32]>,
    ) -> Result<f32, AppError>;
}

/// Embeds the candidate via the configured provider and compares with
/// cosine similarity. Scores land in [-1, 1].
pub struct EmbeddingCosineStrategy {
    provider: Arc<EmbeddingProvider>,
}

impl EmbeddingCosineStrategy {
    pub fn new(provider: Arc<EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl SimilarityStrategy for EmbeddingCosineStrategy {
    async fn score(
        &self,
        candidate: &str,
        expected: &str,
        expected_embedding: Option<&[f32]>,
    ) -> Result<f32, AppError> {
        let candidate_embedding = self.provider.embed(candidate).await?;
        let expected_embedding = match expected_embedding {
            Some(vector) => vector.to_vec(),
            None => self.provider.embed(expected).await?,
        };

        Ok(cosine_similarity(&candidate_embedding, &expected_embedding))
    }
}

/// Delegates both texts to an external sentence-similarity endpoint and uses
/// its scalar directly. Scores land in [0, 1]. A non-2xx response or an
/// empty score list surfaces as `SimilarityService` and evaluation stops.
pub struct SimilarityServiceStrategy {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    source: &'a str,
    candidates: Vec<&'a str>,
}

impl SimilarityServiceStrategy {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            token,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let url = config.similarity_service_url.clone().ok_or_else(|| {
            AppError::Validation(
                "similarity_service_url is required for the 'service' similarity backend".into(),
            )
        })?;
        Ok(Self::new(url, config.similarity_service_token.clone()))
    }
}

#[async_trait]
impl SimilarityStrategy for SimilarityServiceStrategy {
    async fn score(
        &self,
        candidate: &str,
        expected: &str,
        _expected_embedding: Option<&[f32]>,
    ) -> Result<f32, AppError> {
        let request = SimilarityRequest {
            source: expected,
            candidates: vec![candidate],
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::SimilarityService {
                status: status.as_u16(),
                message,
            });
        }

        let scores: Vec<f32> = response.json().await?;
        debug!(?scores, "Similarity service response");

        scores
            .first()
            .copied()
            .ok_or_else(|| AppError::SimilarityService {
                status: status.as_u16(),
                message: "empty score list in response".into(),
            })
    }
}
