use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::AppError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize, Clone)]
pub enum ApiError {
    #[error("Internal server error")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Category exhausted: {0}")]
    CategoryExhausted(String),

    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::UnknownCategory(category) => {
                Self::ValidationError(format!("unknown category '{category}'"))
            }
            AppError::Validation(msg) => Self::ValidationError(msg),
            AppError::ExhaustedCategory { ref category, .. } => {
                Self::CategoryExhausted(format!("no eligible question left in '{category}'"))
            }
            AppError::SimilarityService { status, message } => {
                Self::UpstreamError(format!("similarity service returned {status}: {message}"))
            }
            AppError::FeedbackService(msg) => {
                Self::UpstreamError(format!("feedback generation failed: {msg}"))
            }
            _ => {
                tracing::error!("Internal error: {:?}", err);
                Self::InternalError("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::InternalError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    status: "error".to_string(),
                },
            ),
            Self::ValidationError(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    status: "error".to_string(),
                },
            ),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: message,
                    status: "error".to_string(),
                },
            ),
            Self::CategoryExhausted(message) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: message,
                    status: "error".to_string(),
                },
            ),
            Self::UpstreamError(message) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: message,
                    status: "error".to_string(),
                },
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: String,
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::AppError;
    use std::fmt::Debug;

    // Helper to check status code
    fn assert_status_code<T: IntoResponse + Debug>(response: T, expected_status: StatusCode) {
        let response = response.into_response();
        assert_eq!(response.status(), expected_status);
    }

    #[test]
    fn test_app_error_to_api_error_conversion() {
        let unknown = AppError::UnknownCategory("Quantum".to_string());
        let api_error = ApiError::from(unknown);
        assert!(matches!(api_error, ApiError::ValidationError(msg) if msg.contains("Quantum")));

        let exhausted = AppError::ExhaustedCategory {
            category: "Databases".to_string(),
            attempts: 50,
        };
        let api_error = ApiError::from(exhausted);
        assert!(
            matches!(api_error, ApiError::CategoryExhausted(msg) if msg.contains("Databases"))
        );

        let similarity = AppError::SimilarityService {
            status: 500,
            message: "model loading".to_string(),
        };
        let api_error = ApiError::from(similarity);
        assert!(matches!(api_error, ApiError::UpstreamError(msg) if msg.contains("500")));

        let feedback = AppError::FeedbackService("timeout".to_string());
        let api_error = ApiError::from(feedback);
        assert!(matches!(api_error, ApiError::UpstreamError(_)));

        // Anything else collapses to a sanitized internal error
        let internal_error =
            AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, "io error"));
        let api_error = ApiError::from(internal_error);
        assert!(matches!(api_error, ApiError::InternalError(_)));
    }

    #[test]
    fn test_api_error_response_status_codes() {
        let error = ApiError::InternalError("server error".to_string());
        assert_status_code(error, StatusCode::INTERNAL_SERVER_ERROR);

        let error = ApiError::NotFound("not found".to_string());
        assert_status_code(error, StatusCode::NOT_FOUND);

        let error = ApiError::ValidationError("invalid input".to_string());
        assert_status_code(error, StatusCode::BAD_REQUEST);

        let error = ApiError::CategoryExhausted("no questions left".to_string());
        assert_status_code(error, StatusCode::CONFLICT);

        let error = ApiError::UpstreamError("similarity service down".to_string());
        assert_status_code(error, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_error_sanitization() {
        // The payload carries detail for logging; the rendered message must not.
        let sensitive_info = "db password incorrect";
        let api_error = ApiError::InternalError(sensitive_info.to_string());
        assert_eq!(api_error.to_string(), "Internal server error");
        assert_status_code(api_error, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
