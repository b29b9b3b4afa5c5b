//! Common error types for the staffrec services

use thiserror::Error;

use crate::api::types::FieldError;

/// Common result type for staffrec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the staffrec services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record validation failure, carries one entry per offending field
    #[error("Wrong data ({} field errors)", .0.len())]
    WrongData(Vec<FieldError>),

    /// Currency code absent from the exchange rate table
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Exchange rate lookup returned a malformed document
    #[error("Exchange rate format error: {0}")]
    ExchangeRateFormat(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
