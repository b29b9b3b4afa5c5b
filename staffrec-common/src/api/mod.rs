//! Shared API request/response types

pub mod types;

pub use types::{Employee, EmployeeIn, EmployeeSearch, FieldError, Salary, WrongDataBody};
