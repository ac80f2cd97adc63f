use std::sync::Arc;

use api_router::{api_routes_v1, api_state::ApiState};
use axum::Router;
use common::{
    catalog::Catalog,
    storage::{embedding_cache::EmbeddingCache, store::StorageManager},
    utils::{
        config::{get_config, SimilarityBackend},
        embedding::EmbeddingProvider,
    },
};
use evaluation_pipeline::{
    similarity::{EmbeddingCosineStrategy, SimilarityServiceStrategy, SimilarityStrategy},
    Evaluator,
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    // Load the question bank
    let catalog = Arc::new(Catalog::load_from_csv(&config.question_bank_path)?);
    info!(
        questions = catalog.len(),
        categories = catalog.categories().len(),
        path = %config.question_bank_path,
        "Question bank loaded"
    );

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url),
    ));

    // Create embedding provider based on config
    let embedding_provider = Arc::new(EmbeddingProvider::from_config(
        &config,
        Some(openai_client.clone()),
    )?);
    info!(
        embedding_backend = embedding_provider.backend_label(),
        embedding_dimension = embedding_provider.dimension(),
        "Embedding provider initialized"
    );

    // Load or compute the persisted embedding artifacts
    let storage = StorageManager::new(&config).await?;
    let embeddings = Arc::new(
        EmbeddingCache::open(&storage, Arc::clone(&embedding_provider), &catalog).await?,
    );

    let similarity: Box<dyn SimilarityStrategy> = match config.similarity_backend {
        SimilarityBackend::Embedding => Box::new(EmbeddingCosineStrategy::new(Arc::clone(
            &embedding_provider,
        ))),
        SimilarityBackend::Service => Box::new(SimilarityServiceStrategy::from_config(&config)?),
    };
    let evaluator = Arc::new(Evaluator::new(
        similarity,
        Arc::clone(&openai_client),
        config.chat_model.clone(),
    ));

    let api_state = ApiState::new(catalog, embeddings, evaluator, config.clone());

    // Create Axum router. The API is consumed from browsers, hence CORS.
    let app = Router::new()
        .nest("/api/v1", api_routes_v1(&api_state))
        .layer(CorsLayer::permissive())
        .with_state(api_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::storage::store::testing::test_config_memory;
    use tower::ServiceExt;

    const SAMPLE: &[u8] = b"Question,Answer,Category\n\
        What is an index?,A lookup structure,Databases\n\
        What is a transaction?,An atomic unit of work,Databases\n\
        What is TCP?,A reliable transport protocol,Networking\n";

    async fn smoke_app() -> Router {
        let config = test_config_memory();
        let catalog = Arc::new(Catalog::from_csv_bytes(SAMPLE).expect("catalog"));
        let provider = Arc::new(
            EmbeddingProvider::from_config(&config, None).expect("hashed provider"),
        );
        let storage = StorageManager::new(&config).await.expect("storage");
        let embeddings = Arc::new(
            EmbeddingCache::open(&storage, Arc::clone(&provider), &catalog)
                .await
                .expect("embedding cache"),
        );
        let openai_client = Arc::new(async_openai::Client::with_config(
            async_openai::config::OpenAIConfig::new()
                .with_api_key(&config.openai_api_key)
                .with_api_base(&config.openai_base_url),
        ));
        let evaluator = Arc::new(Evaluator::new(
            Box::new(EmbeddingCosineStrategy::new(Arc::clone(&provider))),
            openai_client,
            config.chat_model.clone(),
        ));
        let api_state = ApiState::new(catalog, embeddings, evaluator, config);

        Router::new()
            .nest("/api/v1", api_routes_v1(&api_state))
            .layer(CorsLayer::permissive())
            .with_state(api_state)
    }

    #[tokio::test]
    async fn smoke_startup_with_in_memory_state() {
        let app = smoke_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/live")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);

        let ready_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("ready response");
        assert_eq!(ready_response.status(), StatusCode::OK);

        let categories_response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/categories")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("categories response");
        assert_eq!(categories_response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(categories_response.into_body(), usize::MAX)
            .await
            .expect("body");
        let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            parsed["categories"],
            serde_json::json!(["Databases", "Networking"])
        );
    }
}
