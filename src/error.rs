//! Error types for flightboard
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. The core never recovers from these internally; every
//! condition is surfaced to the HTTP layer, which maps it to a status code.

use thiserror::Error;

/// Main error type for flightboard
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Positional operation outside the valid range
    #[error("Position {position} out of range for queue of length {len}")]
    OutOfRange { position: usize, len: usize },

    /// Lookup-by-code found no matching flight
    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    /// A flight with the same code already exists
    #[error("Flight code already exists: {0}")]
    CodeExists(String),

    /// Departure time failed to parse
    #[error("Invalid departure time: {0}")]
    InvalidTime(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using flightboard Error
pub type Result<T> = std::result::Result<T, Error>;
