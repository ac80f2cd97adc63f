use async_openai::error::OpenAIError;
use thiserror::Error;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed question bank: {0}")]
    MalformedData(String),
    #[error("Stale embedding artifact for {kind}: expected {expected} vectors, found {found}")]
    StaleCache {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("No eligible question left in category '{category}' after {attempts} attempts")]
    ExhaustedCategory { category: String, attempts: usize },
    #[error("Similarity service error ({status}): {message}")]
    SimilarityService { status: u16, message: String },
    #[error("Feedback service error: {0}")]
    FeedbackService(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
