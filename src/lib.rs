//! # Flightboard
//!
//! Flight tracking backend: flights are persisted in SQLite, exposed over an
//! HTTP API, and mirrored into one process-wide ordered sequence that keeps
//! emergency flights ahead of scheduled ones while preserving relative order
//! within each tier.
//!
//! **Architecture:** axum HTTP layer over a `FlightBoard` service that owns
//! the in-memory flight sequence and pairs every queue mutation with its
//! SQLite write.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod queue;

pub use error::{Error, Result};
pub use queue::FlightBoard;
