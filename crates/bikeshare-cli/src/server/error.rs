//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use bikeshare::BikeshareError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the bikeshare library.
    Bikeshare(BikeshareError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Status and error code for a library error.
fn classify(err: &BikeshareError) -> (StatusCode, &'static str) {
    match err {
        BikeshareError::MissingFeature { .. } | BikeshareError::FeatureOutOfRange { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input")
        }
        BikeshareError::ArtifactMissing { .. } | BikeshareError::ModelUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
        }
        BikeshareError::Artifact { .. } | BikeshareError::FeatureOrder { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "model_error")
        }
        BikeshareError::Config(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "data_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Bikeshare(e) => {
                let (status, error) = classify(&e);
                (status, error, e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<BikeshareError> for ApiError {
    fn from(err: BikeshareError) -> Self {
        ApiError::Bikeshare(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Bikeshare(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare::PredictionMode;

    #[test]
    fn test_prediction_errors_classified() {
        let missing = BikeshareError::MissingFeature {
            mode: PredictionMode::Day,
            missing: vec!["temp".to_string()],
        };
        assert_eq!(classify(&missing).0, StatusCode::UNPROCESSABLE_ENTITY);

        let unavailable = BikeshareError::ModelUnavailable {
            mode: PredictionMode::Hour,
        };
        assert_eq!(classify(&unavailable).1, "model_unavailable");

        let schema = BikeshareError::Schema {
            missing: vec!["dteday".to_string()],
        };
        assert_eq!(classify(&schema).1, "data_error");
    }
}
