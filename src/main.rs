//! Flightboard - Main entry point
//!
//! Flight tracking backend: initializes the database, rebuilds the flight
//! queue from storage, and serves the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flightboard::config::Config;
use flightboard::queue::FlightBoard;
use flightboard::{api, db};

/// Command-line arguments for flightboard
#[derive(Parser, Debug)]
#[command(name = "flightboard")]
#[command(about = "Flight tracking backend with a priority-aware service queue")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5760", env = "FLIGHTBOARD_PORT")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(short, long, default_value = "flightboard.db", env = "FLIGHTBOARD_DB")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Starting flightboard on port {}", args.port);
    info!("Database: {}", args.database.display());

    // Initialize database and schema
    let pool = db::init::init_database(&args.database)
        .await
        .context("Failed to initialize database")?;

    // Rebuild the flight queue from the storage snapshot
    let board = Arc::new(FlightBoard::new(pool));
    board.init().await.context("Failed to load flight queue")?;
    info!("Flight queue loaded: {} flights", board.len().await);

    let config = Config {
        port: args.port,
        db_path: args.database,
    };

    api::server::run(config, board)
        .await
        .context("Server error")?;

    Ok(())
}
