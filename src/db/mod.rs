//! Database access layer
//!
//! Provides pool initialization, schema creation, and flight queries.

pub mod flights;
pub mod init;
pub mod models;

pub use models::{Flight, FlightStatus};
