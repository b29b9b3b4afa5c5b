//! HTTP API handlers for staffrec-server

pub mod employees;
pub mod error;
pub mod forecasts;
pub mod health;
pub mod statistics;

pub use employees::{
    create_employee, delete_employee, get_employee, list_employees, search_employees,
    update_employee,
};
pub use error::ApiError;
pub use forecasts::growth_forecast;
pub use health::health_routes;
pub use statistics::{growth_history, highest_paid, longest_tenured};
