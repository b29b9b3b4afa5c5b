//! Database access layer for staffrec-server

pub mod employees;

pub use employees::{
    create_employee, delete_employee, get_employee, list_employees, longest_tenured_employees,
    search_employees, title_hire_dates, update_employee,
};
