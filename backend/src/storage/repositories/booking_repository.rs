use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::BookingStatus;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::booking::parse_status;
use crate::domain::models::{Booking, NewBooking};
use crate::storage::connection::DbConnection;
use crate::storage::traits::BookingStorage;

const BOOKING_COLUMNS: &str = "id, handyman_id, handyman_name, customer_id, customer_name, \
     date_time, description, address, status, created_at";

/// Repository for booking documents
#[derive(Clone)]
pub struct BookingRepository {
    db: DbConnection,
}

impl BookingRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Invalid {} timestamp: {}", field, raw))
    }

    fn row_to_booking(row: &SqliteRow) -> Result<Booking> {
        Ok(Booking {
            id: row.get("id"),
            handyman_id: row.get("handyman_id"),
            handyman_name: row.get("handyman_name"),
            customer_id: row.get("customer_id"),
            customer_name: row.get("customer_name"),
            date_time: Self::parse_timestamp(&row.get::<String, _>("date_time"), "date_time")?,
            description: row.get("description"),
            address: row.get("address"),
            status: parse_status(&row.get::<String, _>("status"))?,
            created_at: Self::parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
        })
    }
}

#[async_trait]
impl BookingStorage for BookingRepository {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking> {
        let id = uuid::Uuid::new_v4().simple().to_string();

        sqlx::query(
            r#"
            INSERT INTO bookings (id, handyman_id, handyman_name, customer_id, customer_name,
                                  date_time, description, address, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&booking.handyman_id)
        .bind(&booking.handyman_name)
        .bind(&booking.customer_id)
        .bind(&booking.customer_name)
        .bind(booking.date_time.to_rfc3339())
        .bind(&booking.description)
        .bind(&booking.address)
        .bind(booking.status.as_str())
        .execute(self.db.pool())
        .await?;

        self.get_booking(&id)
            .await?
            .with_context(|| format!("Booking {} missing after insert", id))
    }

    async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS))
            .bind(booking_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_booking).transpose()
    }

    async fn list_bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bookings WHERE customer_id = ? ORDER BY ROWID",
            BOOKING_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn update_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<Option<Booking>> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(booking_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_booking(booking_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn setup_test() -> BookingRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        BookingRepository::new(db)
    }

    fn new_booking(customer_id: &str) -> NewBooking {
        NewBooking {
            handyman_id: "handyman-1".to_string(),
            handyman_name: Some("Alice".to_string()),
            customer_id: customer_id.to_string(),
            customer_name: "Carl".to_string(),
            date_time: Utc.with_ymd_and_hms(2030, 5, 1, 14, 0, 0).unwrap(),
            description: "fix sink".to_string(),
            address: "1 Main St".to_string(),
            status: BookingStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_create_booking_assigns_id_and_timestamp() {
        let repo = setup_test().await;

        let before = Utc::now() - chrono::Duration::seconds(5);
        let booking = repo.create_booking(&new_booking("customer-1")).await.unwrap();

        assert!(!booking.id.is_empty());
        assert!(booking.created_at >= before);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.date_time, Utc.with_ymd_and_hms(2030, 5, 1, 14, 0, 0).unwrap());
        assert_eq!(booking.handyman_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_list_bookings_for_customer() {
        let repo = setup_test().await;
        let first = repo.create_booking(&new_booking("customer-1")).await.unwrap();
        repo.create_booking(&new_booking("customer-2")).await.unwrap();
        let second = repo.create_booking(&new_booking("customer-1")).await.unwrap();

        let bookings = repo.list_bookings_for_customer("customer-1").await.unwrap();
        let ids: Vec<_> = bookings.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_booking_status() {
        let repo = setup_test().await;
        let booking = repo.create_booking(&new_booking("customer-1")).await.unwrap();

        let updated = repo
            .update_booking_status(&booking.id, BookingStatus::Cancelled)
            .await
            .unwrap()
            .expect("Booking should exist");
        assert_eq!(updated.status, BookingStatus::Cancelled);
        assert_eq!(updated.created_at, booking.created_at);

        // Rewriting the same value is accepted
        let again = repo
            .update_booking_status(&booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert!(again.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_booking() {
        let repo = setup_test().await;
        let result = repo.update_booking_status("missing", BookingStatus::Cancelled).await.unwrap();
        assert!(result.is_none());
    }
}
