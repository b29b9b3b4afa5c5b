//! staffrec-server library - employee records backend
//!
//! HTTP service over SQLite exposing employee CRUD, derived statistics
//! and growth forecasts.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::rates::RateProvider;

pub mod api;
pub mod db;
pub mod forecast;
pub mod rates;
pub mod statistics;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Currency exchange rate lookup, injected at startup
    pub rates: Arc<dyn RateProvider>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, rates: Arc<dyn RateProvider>) -> Self {
        Self { db, rates }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use axum::routing::post;

    Router::new()
        .route("/employee", post(api::create_employee))
        .route(
            "/employee/:id",
            get(api::get_employee)
                .put(api::update_employee)
                .delete(api::delete_employee),
        )
        .route("/employees", get(api::list_employees))
        .route("/search/employees", post(api::search_employees))
        .route("/statistics/longest-tenured", get(api::longest_tenured))
        .route("/statistics/highest-paid", get(api::highest_paid))
        .route("/statistics/growth-history", get(api::growth_history))
        .route("/forecasts/growth", get(api::growth_forecast))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
