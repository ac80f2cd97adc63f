use std::sync::Arc;

use bytes::Bytes;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};
use tracing::{info, warn};

use crate::{
    catalog::Catalog, error::AppError, storage::store::StorageManager,
    utils::embedding::EmbeddingProvider,
};

/// The three persisted embedding corpora.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    Questions,
    Answers,
    Categories,
}

impl EmbeddingKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Answers => "answers",
            Self::Categories => "categories",
        }
    }

    pub fn artifact_location(self) -> String {
        format!("embeddings/{}.json", self.label())
    }
}

/// Precomputed embeddings for the whole catalog, addressed by the same
/// indices as the catalog itself (category embeddings by position in the
/// catalog's first-seen category order).
///
/// Artifacts are loaded from durable storage when present and count-valid;
/// anything missing or stale is recomputed once and persisted, so an
/// unchanged catalog never re-embeds across restarts.
pub struct EmbeddingCache {
    questions: Vec<Vec<f32>>,
    answers: Vec<Vec<f32>>,
    categories: Vec<Vec<f32>>,
    provider: Arc<EmbeddingProvider>,
}

impl EmbeddingCache {
    pub async fn open(
        storage: &StorageManager,
        provider: Arc<EmbeddingProvider>,
        catalog: &Catalog,
    ) -> Result<Self, AppError> {
        let question_texts: Vec<String> = catalog
            .records()
            .iter()
            .map(|r| r.question.clone())
            .collect();
        let answer_texts: Vec<String> =
            catalog.records().iter().map(|r| r.answer.clone()).collect();
        let category_names: Vec<String> = catalog.categories().to_vec();

        let questions =
            load_or_compute(storage, &provider, EmbeddingKind::Questions, question_texts).await?;
        let answers =
            load_or_compute(storage, &provider, EmbeddingKind::Answers, answer_texts).await?;
        let categories =
            load_or_compute(storage, &provider, EmbeddingKind::Categories, category_names).await?;

        Ok(Self {
            questions,
            answers,
            categories,
            provider,
        })
    }

    /// Embed one ad-hoc text, uncached. Used for candidate answers at
    /// evaluation time.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError> {
        self.provider.embed(text).await
    }

    pub fn question(&self, index: usize) -> Option<&[f32]> {
        self.questions.get(index).map(Vec::as_slice)
    }

    pub fn answer(&self, index: usize) -> Option<&[f32]> {
        self.answers.get(index).map(Vec::as_slice)
    }

    /// Category embedding by position in the catalog's category order.
    pub fn category(&self, position: usize) -> Option<&[f32]> {
        self.categories.get(position).map(Vec::as_slice)
    }

    pub fn questions(&self) -> &[Vec<f32>] {
        &self.questions
    }

    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }
}

async fn load_or_compute(
    storage: &StorageManager,
    provider: &EmbeddingProvider,
    kind: EmbeddingKind,
    texts: Vec<String>,
) -> Result<Vec<Vec<f32>>, AppError> {
    let location = kind.artifact_location();

    if storage.exists(&location).await? {
        match load_artifact(storage, kind, texts.len()).await {
            Ok(vectors) => {
                info!(
                    kind = kind.label(),
                    count = vectors.len(),
                    "Loaded embedding artifact"
                );
                return Ok(vectors);
            }
            Err(AppError::StaleCache {
                kind,
                expected,
                found,
            }) => {
                warn!(
                    kind,
                    expected, found, "Embedding artifact is stale; recomputing"
                );
            }
            Err(e) => return Err(e),
        }
    }

    let retry_strategy = ExponentialBackoff::from_millis(100).map(jitter).take(3);
    let vectors = Retry::spawn(retry_strategy, || provider.embed_batch(texts.clone())).await?;

    let payload = serde_json::to_vec(&vectors)?;
    storage.put(&location, Bytes::from(payload)).await?;
    info!(
        kind = kind.label(),
        count = vectors.len(),
        "Computed and persisted embedding artifact"
    );

    Ok(vectors)
}

async fn load_artifact(
    storage: &StorageManager,
    kind: EmbeddingKind,
    expected: usize,
) -> Result<Vec<Vec<f32>>, AppError> {
    let bytes = storage.get(&kind.artifact_location()).await?;
    let vectors: Vec<Vec<f32>> = serde_json::from_slice(&bytes)?;

    if vectors.len() != expected {
        return Err(AppError::StaleCache {
            kind: kind.label(),
            expected,
            found: vectors.len(),
        });
    }

    Ok(vectors)
}
