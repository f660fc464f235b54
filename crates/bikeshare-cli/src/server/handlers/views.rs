//! Dashboard views handler.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bikeshare::{DashboardViews, FilterSpec, Season, Weather};

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for the views endpoint.
///
/// Omitted parameters take the widest value. A code list that is present
/// but empty (`season=`) selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct ViewsQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Comma-separated season codes.
    pub season: Option<String>,
    /// Comma-separated weather codes.
    pub weather: Option<String>,
}

/// Response for the views endpoint.
#[derive(Serialize)]
pub struct ViewsResponse {
    pub filter: FilterSpec,
    pub views: DashboardViews,
}

fn parse_codes(param: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid {} code '{}'", param, s)))
        })
        .collect()
}

impl ViewsQuery {
    pub fn apply_to(&self, base: FilterSpec) -> Result<FilterSpec, ApiError> {
        let start = self.start.unwrap_or(base.date_start);
        let end = self.end.unwrap_or(base.date_end);
        let mut filter = base.with_range(start, end);
        if let Some(seasons) = &self.season {
            filter = filter.with_seasons(parse_codes("season", seasons)?.into_iter().map(Season));
        }
        if let Some(weathers) = &self.weather {
            filter =
                filter.with_weathers(parse_codes("weather", weathers)?.into_iter().map(Weather));
        }
        Ok(filter)
    }
}

/// The six views for a selection.
pub async fn get_views(
    State(state): State<AppState>,
    Query(query): Query<ViewsQuery>,
) -> Result<Json<ViewsResponse>, ApiError> {
    let dashboard = state.dashboard.clone();
    let base = blocking(move || dashboard.default_filter()).await?;
    let filter = query.apply_to(base)?;

    let dashboard = state.dashboard.clone();
    let selected = filter.clone();
    let views = blocking(move || dashboard.views(&selected)).await?;

    Ok(Json(ViewsResponse { filter, views }))
}
