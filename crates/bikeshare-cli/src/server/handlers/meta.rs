//! Dataset metadata handler.

use axum::{Json, extract::State};
use serde::Serialize;

use bikeshare::DashboardMeta;

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for the metadata endpoint.
#[derive(Serialize)]
pub struct MetaResponse {
    #[serde(flatten)]
    pub meta: DashboardMeta,
    /// Whether a predictor has loaded from the four model artifacts.
    pub models_available: bool,
}

/// Date bounds and category labels for building filter controls.
pub async fn get_meta(State(state): State<AppState>) -> Result<Json<MetaResponse>, ApiError> {
    let dashboard = state.dashboard.clone();
    let response = blocking(move || {
        let meta = dashboard.meta()?;
        let models_available = dashboard.models_loaded();
        Ok(MetaResponse {
            meta,
            models_available,
        })
    })
    .await?;
    Ok(Json(response))
}
