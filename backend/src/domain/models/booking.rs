use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use shared::BookingStatus;

/// Customer name recorded when the identity provider has none
pub const ANONYMOUS_CUSTOMER: &str = "Anonymous";

/// A customer's request to engage a handyman.
///
/// `handyman_name` and `customer_name` are copies taken at creation time and
/// are never refreshed when either party is renamed.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub handyman_id: String,
    pub handyman_name: Option<String>,
    pub customer_id: String,
    pub customer_name: String,
    pub date_time: DateTime<Utc>,
    pub description: String,
    pub address: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }
}

/// Booking fields supplied by the caller; the store assigns id and creation time
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub handyman_id: String,
    pub handyman_name: Option<String>,
    pub customer_id: String,
    pub customer_name: String,
    pub date_time: DateTime<Utc>,
    pub description: String,
    pub address: String,
    pub status: BookingStatus,
}

pub fn parse_status(value: &str) -> Result<BookingStatus> {
    match value {
        "pending" => Ok(BookingStatus::Pending),
        "cancelled" => Ok(BookingStatus::Cancelled),
        other => Err(anyhow!("Unknown booking status: {}", other)),
    }
}
