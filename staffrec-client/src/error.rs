//! Client-side error taxonomy
//!
//! Mirrors what the UI needs to render: wrong-data errors carry the
//! field triples for per-field highlighting, everything else collapses
//! into a status indicator.

use thiserror::Error;

use staffrec_common::api::types::FieldError;

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by backend calls
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure reaching the backend
    #[error("Connection error: {0}")]
    Connection(reqwest::Error),

    /// Backend replied with a 5xx status
    #[error("Server error (status {0})")]
    Server(u16),

    /// Validation failure, one entry per offending field
    #[error("Wrong data ({} field errors)", .0.len())]
    WrongData(Vec<FieldError>),

    /// Referenced entity absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the request (4xx other than 422/404)
    #[error("Request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Response decode error: {0}")]
    Decode(String),
}
