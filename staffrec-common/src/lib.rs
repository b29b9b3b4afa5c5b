//! # Staffrec Common Library
//!
//! Shared code for the staffrec services:
//! - Wire types for the employee aggregate and error bodies
//! - Input validation and normalization
//! - Configuration loading
//! - SQLite schema bootstrap

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod validate;

pub use error::{Error, Result};
