//! Employee CRUD and search API
//!
//! Writes validate and normalize the document first and reply 422 with
//! the full `detail` list on failure. Deletion returns the removed
//! aggregate snapshot: the client's undo machinery recreates records
//! from it.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use staffrec_common::api::types::{Employee, EmployeeIn, EmployeeSearch};
use staffrec_common::validate::validate_employee;
use staffrec_common::Error;

use crate::api::ApiError;
use crate::{db, AppState};

/// Query parameters for listing employees
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// POST /employee
pub async fn create_employee(
    State(state): State<AppState>,
    Json(mut employee): Json<EmployeeIn>,
) -> Result<Json<Employee>, ApiError> {
    let errors = validate_employee(&mut employee);
    if !errors.is_empty() {
        return Err(Error::WrongData(errors).into());
    }

    let created = db::create_employee(&state.db, &employee).await?;
    info!("Created employee {}", created.id);
    Ok(Json(created))
}

/// GET /employee/:id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, ApiError> {
    let employee = db::get_employee(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("employee {}", id)))?;
    Ok(Json(employee))
}

/// GET /employees?skip&limit
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = db::list_employees(&state.db, query.skip, query.limit).await?;
    Ok(Json(employees))
}

/// PUT /employee/:id
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut employee): Json<EmployeeIn>,
) -> Result<Json<Employee>, ApiError> {
    let errors = validate_employee(&mut employee);
    if !errors.is_empty() {
        return Err(Error::WrongData(errors).into());
    }

    let updated = db::update_employee(&state.db, id, &employee)
        .await?
        .ok_or_else(|| Error::NotFound(format!("employee {}", id)))?;
    info!("Updated employee {}", id);
    Ok(Json(updated))
}

/// DELETE /employee/:id
///
/// Responds with the deleted aggregate snapshot.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, ApiError> {
    let deleted = db::delete_employee(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("employee {}", id)))?;
    info!("Deleted employee {}", id);
    Ok(Json(deleted))
}

/// POST /search/employees
pub async fn search_employees(
    State(state): State<AppState>,
    Json(search): Json<EmployeeSearch>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = db::search_employees(&state.db, &search).await?;
    Ok(Json(employees))
}
