//! Statistics API

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use staffrec_common::api::types::Employee;

use crate::api::ApiError;
use crate::{statistics, AppState};

/// Query parameters for the two top-N employee queries
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub count: i64,
}

/// Query parameters for the growth-history query
#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

/// GET /statistics/longest-tenured?count=N
pub async fn longest_tenured(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = statistics::longest_tenured(&state.db, query.count).await?;
    Ok(Json(employees))
}

/// GET /statistics/highest-paid?count=N
pub async fn highest_paid(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees =
        statistics::highest_paid(&state.db, state.rates.as_ref(), query.count).await?;
    Ok(Json(employees))
}

/// GET /statistics/growth-history?title=NAME
pub async fn growth_history(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<BTreeMap<i32, i64>>, ApiError> {
    let history = statistics::title_growth_history(&state.db, &query.title).await?;
    Ok(Json(history))
}
