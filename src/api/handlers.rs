//! HTTP request handlers
//!
//! One handler per endpoint, mapping queue and storage errors onto status
//! codes: out-of-range positions, duplicate codes, and malformed times are
//! client errors (400), unknown flight codes are 404, storage failures 500.

use crate::api::server::AppContext;
use crate::db::models::{Flight, FlightStatus};
use crate::error::Error;
use crate::queue::board::NewFlight;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub code: String,
    pub status: FlightStatus,
    /// "HH:MM"
    pub departure_time: String,
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct InsertFlightRequest {
    pub code: String,
    pub status: FlightStatus,
    /// "HH:MM"
    pub departure_time: String,
    pub origin: String,
    pub destination: String,
    pub position: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: FlightStatus,
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    length: usize,
    flights: Vec<Flight>,
}

#[derive(Debug, Serialize)]
pub struct PeekResponse {
    flight: Option<Flight>,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    status: String,
    flight: Flight,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    status: String,
    flight: Flight,
    position: usize,
}

type HandlerError = (StatusCode, Json<StatusResponse>);

/// Map a core error onto an HTTP status + body
fn error_response(err: Error) -> HandlerError {
    let status = match &err {
        Error::OutOfRange { .. } | Error::CodeExists(_) | Error::InvalidTime(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::FlightNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(StatusResponse {
            status: format!("error: {}", err),
        }),
    )
}

/// Parse an "HH:MM" departure time from a request body
fn parse_departure_time(raw: &str) -> Result<NaiveTime, Error> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| Error::InvalidTime(format!("Expected HH:MM, got '{}'", raw)))
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "module": "flightboard",
        "version": env!("CARGO_PKG_VERSION"),
        "port": ctx.config.port,
        "database": ctx.config.db_path.display().to_string(),
    }))
}

// ============================================================================
// Flight Queue Endpoints
// ============================================================================

/// POST /flights - Create a flight and queue it per its status
pub async fn create_flight(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateFlightRequest>,
) -> Result<(StatusCode, Json<Flight>), HandlerError> {
    info!("Create flight request: {}", req.code);

    let departure_time = parse_departure_time(&req.departure_time).map_err(error_response)?;

    let new = NewFlight {
        code: req.code,
        status: req.status,
        departure_time,
        origin: req.origin,
        destination: req.destination,
    };

    match ctx.board.create_flight(new).await {
        Ok(flight) => Ok((StatusCode::CREATED, Json(flight))),
        Err(e) => {
            error!("Failed to create flight: {}", e);
            Err(error_response(e))
        }
    }
}

/// GET /flights/queue - All flights in current service order
pub async fn get_queue(State(ctx): State<AppContext>) -> Json<QueueResponse> {
    let flights = ctx.board.flights_in_order().await;
    Json(QueueResponse {
        length: flights.len(),
        flights,
    })
}

/// GET /flights/next - First flight without removing it
///
/// An empty queue is a normal occurrence: 200 with a null flight.
pub async fn next_flight(State(ctx): State<AppContext>) -> Json<PeekResponse> {
    Json(PeekResponse {
        flight: ctx.board.next_flight().await,
    })
}

/// GET /flights/last - Last flight without removing it
pub async fn last_flight(State(ctx): State<AppContext>) -> Json<PeekResponse> {
    Json(PeekResponse {
        flight: ctx.board.last_flight().await,
    })
}

/// POST /flights/insert - Create a flight at an explicit queue position
pub async fn insert_flight(
    State(ctx): State<AppContext>,
    Json(req): Json<InsertFlightRequest>,
) -> Result<(StatusCode, Json<Flight>), HandlerError> {
    info!("Insert flight request: {} at position {}", req.code, req.position);

    let departure_time = parse_departure_time(&req.departure_time).map_err(error_response)?;

    let new = NewFlight {
        code: req.code,
        status: req.status,
        departure_time,
        origin: req.origin,
        destination: req.destination,
    };

    match ctx.board.insert_flight_at(new, req.position).await {
        Ok(flight) => Ok((StatusCode::CREATED, Json(flight))),
        Err(e) => {
            error!("Failed to insert flight: {}", e);
            Err(error_response(e))
        }
    }
}

/// DELETE /flights/queue/:position - Remove the flight at a queue position
pub async fn remove_flight(
    State(ctx): State<AppContext>,
    Path(position): Path<usize>,
) -> Result<Json<RemoveResponse>, HandlerError> {
    info!("Remove flight request: position {}", position);

    match ctx.board.remove_flight_at(position).await {
        Ok(flight) => {
            info!("Removed flight {} from position {}", flight.code, position);
            Ok(Json(RemoveResponse {
                status: "ok".to_string(),
                flight,
            }))
        }
        Err(e) => {
            error!("Failed to remove flight: {}", e);
            Err(error_response(e))
        }
    }
}

/// PATCH /flights/:code/status - Update a flight's priority tier
///
/// Emergency moves the flight to the front of the queue, scheduled to the
/// back; delayed leaves its position unchanged.
pub async fn update_status(
    State(ctx): State<AppContext>,
    Path(code): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, HandlerError> {
    info!("Status update request: {} -> {}", code, req.status.as_str());

    match ctx.board.update_status(&code, req.status).await {
        Ok((flight, position)) => Ok(Json(UpdateStatusResponse {
            status: "ok".to_string(),
            flight,
            position,
        })),
        Err(e) => {
            error!("Failed to update flight status: {}", e);
            Err(error_response(e))
        }
    }
}
