//! Flight queue
//!
//! The ordered flight sequence (service order, front = next to be served)
//! and the board service that owns the process-wide instance.

pub mod board;
pub mod sequence;

pub use board::FlightBoard;
pub use sequence::FlightSequence;
