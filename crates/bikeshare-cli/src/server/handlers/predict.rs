//! Prediction handler.

use axum::{
    Json,
    extract::{Path, State},
};

use bikeshare::{Prediction, PredictionInput, PredictionMode};

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Predict a rental count with the `day` or `hour` model.
pub async fn predict(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Json(input): Json<PredictionInput>,
) -> Result<Json<Prediction>, ApiError> {
    let mode: PredictionMode = mode
        .parse()
        .map_err(|e: bikeshare::BikeshareError| ApiError::BadRequest(e.to_string()))?;

    let dashboard = state.dashboard.clone();
    let prediction = blocking(move || dashboard.predict(mode, &input)).await?;
    Ok(Json(prediction))
}
