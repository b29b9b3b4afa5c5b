//! staffrec-client library - desktop client service layer
//!
//! Everything a GUI front end needs to talk to the staffrec backend:
//! HTTP clients for storage, statistics and forecasts, the reversible
//! command history behind undo, and the long-operation event plumbing
//! that keeps network calls off the UI thread.

pub mod commands;
pub mod editor;
pub mod error;
pub mod forecasts;
pub mod operations;
pub mod statistics;
pub mod storage;

pub use error::{ClientError, Result};
