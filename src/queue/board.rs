//! Flight board service
//!
//! Owns the process-wide flight sequence behind a single RwLock and pairs
//! every queue mutation with the corresponding database write. Each
//! operation's full read-modify-write span runs under one lock acquisition,
//! so concurrent requests cannot interleave inside a relocation.

use crate::db;
use crate::db::models::{Flight, FlightStatus};
use crate::error::{Error, Result};
use crate::queue::sequence::FlightSequence;
use chrono::NaiveTime;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Fields of a flight to be created
///
/// The guid is assigned by the board on creation.
#[derive(Debug, Clone)]
pub struct NewFlight {
    pub code: String,
    pub status: FlightStatus,
    pub departure_time: NaiveTime,
    pub origin: String,
    pub destination: String,
}

/// Flight board: the singleton queue plus its backing storage
#[derive(Clone)]
pub struct FlightBoard {
    db: SqlitePool,
    sequence: Arc<RwLock<FlightSequence>>,
}

impl FlightBoard {
    /// Create a new board with an empty queue
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            sequence: Arc::new(RwLock::new(FlightSequence::new())),
        }
    }

    /// Rebuild the queue from the storage snapshot
    ///
    /// Called once at startup. Flights already marked emergency go to the
    /// front, all others to the back, preserving storage order within each
    /// tier.
    pub async fn init(&self) -> Result<()> {
        info!("Loading flight queue from database...");
        let flights = db::flights::get_all_flights(&self.db).await?;

        let mut sequence = self.sequence.write().await;
        // Emergencies fill positions 0..n in storage order; the rest append
        let mut emergencies = 0;
        for flight in flights {
            match flight.status {
                FlightStatus::Emergency => {
                    sequence.insert_at(flight, emergencies)?;
                    emergencies += 1;
                }
                _ => sequence.push_back(flight),
            }
        }

        debug!("Loaded {} flights into the queue", sequence.len());
        Ok(())
    }

    /// Create a flight and queue it per its status
    ///
    /// Emergency flights go to the front, everything else to the back.
    /// Fails with `CodeExists` when the code is already taken.
    pub async fn create_flight(&self, new: NewFlight) -> Result<Flight> {
        // Code check, row insert, and queue insert under one lock acquisition
        let mut sequence = self.sequence.write().await;

        if db::flights::code_exists(&self.db, &new.code).await? {
            return Err(Error::CodeExists(new.code));
        }

        let flight = Flight {
            guid: Uuid::new_v4(),
            code: new.code,
            status: new.status,
            departure_time: new.departure_time,
            origin: new.origin,
            destination: new.destination,
        };
        db::flights::insert_flight(&self.db, &flight).await?;

        match flight.status {
            FlightStatus::Emergency => sequence.push_front(flight.clone()),
            _ => sequence.push_back(flight.clone()),
        }

        debug!("Queued flight {} ({})", flight.code, flight.status.as_str());
        Ok(flight)
    }

    /// Create a flight at an explicit queue position
    ///
    /// Fails with `OutOfRange` when `position > len` and with `CodeExists`
    /// on a duplicate code; in both cases nothing is written.
    pub async fn insert_flight_at(&self, new: NewFlight, position: usize) -> Result<Flight> {
        let mut sequence = self.sequence.write().await;

        if position > sequence.len() {
            return Err(Error::OutOfRange {
                position,
                len: sequence.len(),
            });
        }
        if db::flights::code_exists(&self.db, &new.code).await? {
            return Err(Error::CodeExists(new.code));
        }

        let flight = Flight {
            guid: Uuid::new_v4(),
            code: new.code,
            status: new.status,
            departure_time: new.departure_time,
            origin: new.origin,
            destination: new.destination,
        };
        db::flights::insert_flight(&self.db, &flight).await?;
        sequence.insert_at(flight.clone(), position)?;

        debug!("Queued flight {} at position {}", flight.code, position);
        Ok(flight)
    }

    /// Remove the flight at `position` from the queue and from storage
    pub async fn remove_flight_at(&self, position: usize) -> Result<Flight> {
        let mut sequence = self.sequence.write().await;

        let flight = sequence.remove_at(position)?;
        db::flights::delete_by_code(&self.db, &flight.code).await?;

        debug!("Removed flight {} from position {}", flight.code, position);
        Ok(flight)
    }

    /// Change a flight's priority tier and reposition it accordingly
    ///
    /// The whole find-remove-reinsert span plus the status write execute
    /// under one lock acquisition. Returns the flight and its new position.
    pub async fn update_status(
        &self,
        code: &str,
        new_status: FlightStatus,
    ) -> Result<(Flight, usize)> {
        let mut sequence = self.sequence.write().await;

        let position = sequence.relocate(code, new_status)?;
        if !db::flights::update_status(&self.db, code, new_status).await? {
            warn!("Flight {} present in queue but missing from storage", code);
        }

        let flight = sequence
            .get(position)
            .cloned()
            .ok_or_else(|| Error::Internal(format!("Flight {} lost during relocation", code)))?;

        info!(
            "Flight {} updated to {} and moved to position {}",
            code,
            new_status.as_str(),
            position
        );
        Ok((flight, position))
    }

    /// Next flight to be served, or None when the queue is empty
    pub async fn next_flight(&self) -> Option<Flight> {
        self.sequence.read().await.peek_front().cloned()
    }

    /// Last flight in the queue, or None when the queue is empty
    pub async fn last_flight(&self) -> Option<Flight> {
        self.sequence.read().await.peek_back().cloned()
    }

    /// Snapshot of the queue in service order
    pub async fn flights_in_order(&self) -> Vec<Flight> {
        self.sequence.read().await.iter().cloned().collect()
    }

    /// Queue length
    pub async fn len(&self) -> usize {
        self.sequence.read().await.len()
    }

    /// Check whether the queue is empty
    pub async fn is_empty(&self) -> bool {
        self.sequence.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_flights_table;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_board() -> FlightBoard {
        // Single connection so every query sees the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_flights_table(&pool).await.unwrap();
        FlightBoard::new(pool)
    }

    fn new_flight(code: &str, status: FlightStatus) -> NewFlight {
        NewFlight {
            code: code.to_string(),
            status,
            departure_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            origin: "Madrid".to_string(),
            destination: "Barcelona".to_string(),
        }
    }

    async fn queue_codes(board: &FlightBoard) -> Vec<String> {
        board
            .flights_in_order()
            .await
            .into_iter()
            .map(|f| f.code)
            .collect()
    }

    #[tokio::test]
    async fn test_init_places_emergencies_first_preserving_tier_order() {
        let board = setup_board().await;

        // Seed storage directly, mixed statuses in insertion order
        for (code, status) in [
            ("AV100", FlightStatus::Scheduled),
            ("AV200", FlightStatus::Emergency),
            ("AV300", FlightStatus::Delayed),
            ("AV400", FlightStatus::Emergency),
            ("AV500", FlightStatus::Scheduled),
        ] {
            let flight = Flight {
                guid: Uuid::new_v4(),
                code: code.to_string(),
                status,
                departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                origin: "Lima".to_string(),
                destination: "Bogota".to_string(),
            };
            db::flights::insert_flight(&board.db, &flight).await.unwrap();
        }

        board.init().await.unwrap();

        assert_eq!(
            queue_codes(&board).await,
            vec!["AV200", "AV400", "AV100", "AV300", "AV500"]
        );
    }

    #[tokio::test]
    async fn test_create_flight_routes_by_status() {
        let board = setup_board().await;

        board
            .create_flight(new_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();
        board
            .create_flight(new_flight("AV200", FlightStatus::Delayed))
            .await
            .unwrap();
        board
            .create_flight(new_flight("AV300", FlightStatus::Emergency))
            .await
            .unwrap();

        assert_eq!(queue_codes(&board).await, vec!["AV300", "AV100", "AV200"]);

        // Rows landed in storage too
        assert!(db::flights::code_exists(&board.db, "AV300").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_flight_rejects_duplicate_code() {
        let board = setup_board().await;

        board
            .create_flight(new_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();
        let result = board
            .create_flight(new_flight("AV100", FlightStatus::Emergency))
            .await;

        assert!(matches!(result, Err(Error::CodeExists(_))));
        assert_eq!(board.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_flight_at_validates_position() {
        let board = setup_board().await;

        board
            .create_flight(new_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();

        let result = board
            .insert_flight_at(new_flight("AV200", FlightStatus::Scheduled), 2)
            .await;
        assert!(matches!(result, Err(Error::OutOfRange { position: 2, len: 1 })));
        // Nothing was written
        assert!(!db::flights::code_exists(&board.db, "AV200").await.unwrap());

        board
            .insert_flight_at(new_flight("AV300", FlightStatus::Scheduled), 0)
            .await
            .unwrap();
        assert_eq!(queue_codes(&board).await, vec!["AV300", "AV100"]);
    }

    #[tokio::test]
    async fn test_remove_flight_at_deletes_row() {
        let board = setup_board().await;

        board
            .create_flight(new_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();
        board
            .create_flight(new_flight("AV200", FlightStatus::Scheduled))
            .await
            .unwrap();

        let removed = board.remove_flight_at(0).await.unwrap();
        assert_eq!(removed.code, "AV100");
        assert_eq!(board.len().await, 1);
        assert!(!db::flights::code_exists(&board.db, "AV100").await.unwrap());

        let result = board.remove_flight_at(5).await;
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
    }

    #[tokio::test]
    async fn test_update_status_relocates_and_persists() {
        let board = setup_board().await;

        for code in ["AV100", "AV200", "AV300"] {
            board
                .create_flight(new_flight(code, FlightStatus::Scheduled))
                .await
                .unwrap();
        }

        let (flight, position) = board
            .update_status("AV300", FlightStatus::Emergency)
            .await
            .unwrap();
        assert_eq!(position, 0);
        assert_eq!(flight.status, FlightStatus::Emergency);
        assert_eq!(queue_codes(&board).await, vec!["AV300", "AV100", "AV200"]);

        // Persisted status matches the queue
        let stored = db::flights::get_all_flights(&board.db).await.unwrap();
        let av300 = stored.iter().find(|f| f.code == "AV300").unwrap();
        assert_eq!(av300.status, FlightStatus::Emergency);

        let result = board.update_status("AV999", FlightStatus::Emergency).await;
        assert!(matches!(result, Err(Error::FlightNotFound(_))));
    }

    #[tokio::test]
    async fn test_peeks_on_empty_board() {
        let board = setup_board().await;
        assert!(board.next_flight().await.is_none());
        assert!(board.last_flight().await.is_none());
        assert!(board.is_empty().await);
    }
}
