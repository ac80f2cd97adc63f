use std::sync::Arc;

use common::{
    catalog::Catalog, storage::embedding_cache::EmbeddingCache, utils::config::AppConfig,
};
use evaluation_pipeline::Evaluator;

/// Immutable per-process context shared by all handlers. Catalog and
/// embeddings are read-only after startup, so no locking is needed.
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<Catalog>,
    pub embeddings: Arc<EmbeddingCache>,
    pub evaluator: Arc<Evaluator>,
    pub config: AppConfig,
}

impl ApiState {
    pub fn new(
        catalog: Arc<Catalog>,
        embeddings: Arc<EmbeddingCache>,
        evaluator: Arc<Evaluator>,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog,
            embeddings,
            evaluator,
            config,
        }
    }
}
