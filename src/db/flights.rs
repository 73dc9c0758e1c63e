//! Flight database queries

use crate::db::models::{Flight, FlightStatus};
use crate::error::{Error, Result};
use chrono::NaiveTime;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Departure times are stored as "HH:MM" text
const TIME_FORMAT: &str = "%H:%M";

/// Get all flights in insertion order
///
/// Used once at startup to rebuild the in-memory queue.
pub async fn get_all_flights(db: &SqlitePool) -> Result<Vec<Flight>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, code, status, departure_time, origin, destination
        FROM flights
        ORDER BY created_at, rowid
        "#,
    )
    .fetch_all(db)
    .await?;

    rows.into_iter().map(flight_from_row).collect()
}

/// Check whether a flight with the given code exists
pub async fn code_exists(db: &SqlitePool, code: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM flights WHERE code = ?)")
        .bind(code)
        .fetch_one(db)
        .await?;

    Ok(exists)
}

/// Insert a new flight
pub async fn insert_flight(db: &SqlitePool, flight: &Flight) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO flights (guid, code, status, departure_time, origin, destination)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(flight.guid.to_string())
    .bind(&flight.code)
    .bind(flight.status.as_str())
    .bind(flight.departure_time.format(TIME_FORMAT).to_string())
    .bind(&flight.origin)
    .bind(&flight.destination)
    .execute(db)
    .await?;

    Ok(())
}

/// Update the status of a flight by code
///
/// Returns false when no flight with the code exists.
pub async fn update_status(db: &SqlitePool, code: &str, status: FlightStatus) -> Result<bool> {
    let result = sqlx::query("UPDATE flights SET status = ? WHERE code = ?")
        .bind(status.as_str())
        .bind(code)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a flight by code
pub async fn delete_by_code(db: &SqlitePool, code: &str) -> Result<()> {
    sqlx::query("DELETE FROM flights WHERE code = ?")
        .bind(code)
        .execute(db)
        .await?;

    Ok(())
}

/// Convert a database row into a Flight
fn flight_from_row(row: SqliteRow) -> Result<Flight> {
    let guid_raw: String = row.get("guid");
    let guid = Uuid::parse_str(&guid_raw)
        .map_err(|e| Error::Internal(format!("Invalid flight UUID in storage: {}", e)))?;

    let status_raw: String = row.get("status");
    let status = FlightStatus::from_str(&status_raw)
        .ok_or_else(|| Error::Internal(format!("Unknown flight status in storage: {}", status_raw)))?;

    let time_raw: String = row.get("departure_time");
    let departure_time = NaiveTime::parse_from_str(&time_raw, TIME_FORMAT)
        .map_err(|_| Error::InvalidTime(format!("Malformed departure time in storage: {}", time_raw)))?;

    Ok(Flight {
        guid,
        code: row.get("code"),
        status,
        departure_time,
        origin: row.get("origin"),
        destination: row.get("destination"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_flights_table;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        // Single connection so every query sees the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        create_flights_table(&pool).await.unwrap();
        pool
    }

    fn test_flight(code: &str, status: FlightStatus) -> Flight {
        Flight {
            guid: Uuid::new_v4(),
            code: code.to_string(),
            status,
            departure_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            origin: "Madrid".to_string(),
            destination: "Barcelona".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_all_preserves_order() {
        let pool = setup_test_db().await;

        insert_flight(&pool, &test_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();
        insert_flight(&pool, &test_flight("AV200", FlightStatus::Emergency))
            .await
            .unwrap();
        insert_flight(&pool, &test_flight("AV300", FlightStatus::Delayed))
            .await
            .unwrap();

        let flights = get_all_flights(&pool).await.unwrap();
        let codes: Vec<&str> = flights.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["AV100", "AV200", "AV300"]);
        assert_eq!(flights[1].status, FlightStatus::Emergency);
        assert_eq!(flights[0].departure_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_code_exists() {
        let pool = setup_test_db().await;

        assert!(!code_exists(&pool, "AV100").await.unwrap());
        insert_flight(&pool, &test_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();
        assert!(code_exists(&pool, "AV100").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_status() {
        let pool = setup_test_db().await;

        insert_flight(&pool, &test_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();

        let updated = update_status(&pool, "AV100", FlightStatus::Emergency).await.unwrap();
        assert!(updated);

        let flights = get_all_flights(&pool).await.unwrap();
        assert_eq!(flights[0].status, FlightStatus::Emergency);

        // Unknown code updates nothing
        let updated = update_status(&pool, "AV999", FlightStatus::Emergency).await.unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_delete_by_code() {
        let pool = setup_test_db().await;

        insert_flight(&pool, &test_flight("AV100", FlightStatus::Scheduled))
            .await
            .unwrap();
        delete_by_code(&pool, "AV100").await.unwrap();

        assert!(!code_exists(&pool, "AV100").await.unwrap());
    }
}
