//! # Storage Traits
//!
//! This module defines the document-store abstraction the domain layer works
//! against. Each trait covers one collection and only the operations the
//! marketplace uses: create, get-by-id, equality queries and a single-field
//! update. No transactions or batched writes are offered.

use anyhow::Result;
use async_trait::async_trait;
use shared::BookingStatus;

use crate::domain::models::{Booking, HandymanProfile, NewBooking, UserAccount};

/// Collection of handyman profiles
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Insert a new profile document
    async fn store_profile(&self, profile: &HandymanProfile) -> Result<()>;

    /// Retrieve a single profile by document ID
    async fn get_profile(&self, profile_id: &str) -> Result<Option<HandymanProfile>>;

    /// List profiles in store order, optionally only those flagged as available
    async fn list_profiles(&self, available_only: bool) -> Result<Vec<HandymanProfile>>;

    /// List the profiles created by one identity
    async fn list_profiles_by_owner(&self, user_id: &str) -> Result<Vec<HandymanProfile>>;
}

/// Collection of bookings
#[async_trait]
pub trait BookingStorage: Send + Sync {
    /// Insert a booking; the store assigns its ID and creation timestamp
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking>;

    async fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>>;

    /// List bookings whose customer ID equals the given identity
    async fn list_bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>>;

    /// Overwrite the status field of one booking and return the stored document.
    /// Returns `None` when no booking has that ID.
    async fn update_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<Option<Booking>>;
}

/// Collection of customer accounts
#[async_trait]
pub trait AccountStorage: Send + Sync {
    async fn store_account(&self, account: &UserAccount) -> Result<()>;

    /// Retrieve the account created for an identity, if any
    async fn get_account_by_user(&self, user_id: &str) -> Result<Option<UserAccount>>;
}
