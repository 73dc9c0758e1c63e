//! Service configuration

use std::path::PathBuf;

/// Flightboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
}
