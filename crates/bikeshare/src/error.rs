//! Error types for the bikeshare library.

use std::path::PathBuf;
use thiserror::Error;

use crate::predict::PredictionMode;

/// Main error type for bikeshare operations.
#[derive(Debug, Error)]
pub enum BikeshareError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error fetching a remote data source.
    #[error("Failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more required columns are absent from the source table.
    #[error("Missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A cell could not be parsed into its column's type.
    #[error("Parse error at row {row}, column '{column}': cannot parse '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// A prediction input lacks one or more features required by the mode.
    #[error("Missing feature(s) for {mode} prediction: {}", .missing.join(", "))]
    MissingFeature {
        mode: PredictionMode,
        missing: Vec<String>,
    },

    /// A prediction input lies outside the feature's declared domain.
    #[error("Feature '{feature}' out of range: {value}")]
    FeatureOutOfRange { feature: String, value: f64 },

    /// A model artifact was fitted against a different column order.
    #[error("Feature order mismatch: expected [{}], artifact has [{}]", .expected.join(", "), .found.join(", "))]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// One or more model artifacts are absent from the model directory.
    #[error("Model artifact(s) not found: {}", .artifacts.join(", "))]
    ArtifactMissing { artifacts: Vec<String> },

    /// A model artifact is malformed or incompatible with its input.
    #[error("Invalid model artifact '{artifact}': {message}")]
    Artifact { artifact: String, message: String },

    /// No scaler/regressor pair was supplied for the requested mode.
    #[error("No model available for {mode} prediction")]
    ModelUnavailable { mode: PredictionMode },
}

/// Result type alias for bikeshare operations.
pub type Result<T> = std::result::Result<T, BikeshareError>;
