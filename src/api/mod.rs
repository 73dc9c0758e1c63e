//! REST API implementation
//!
//! Exposes the flight queue operations over HTTP.

pub mod handlers;
pub mod server;

pub use server::AppContext;
