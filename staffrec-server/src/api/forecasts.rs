//! Forecasts API
//!
//! Composes the statistics growth history with the forecaster.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use staffrec_common::Error;

use crate::api::ApiError;
use crate::{forecast, statistics, AppState};

/// Query parameters for the growth forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub title: String,
    pub years: u32,
}

/// GET /forecasts/growth?title=NAME&years=N
pub async fn growth_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<BTreeMap<i32, i64>>, ApiError> {
    if query.years == 0 {
        return Err(Error::InvalidInput("years must be at least 1".to_string()).into());
    }

    let history = statistics::title_growth_history(&state.db, &query.title).await?;
    Ok(Json(forecast::forecast(&history, query.years)))
}
