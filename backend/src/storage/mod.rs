//! # Storage Module
//!
//! Document-store layer for the marketplace. The domain layer only sees the
//! collection traits in [`traits`]; the SQLite repositories here are the
//! default implementation and can be swapped for a hosted document store
//! without touching domain logic.
//!
//! Collections:
//! - `handymen`: handyman profiles
//! - `bookings`: booking requests
//! - `users`: customer accounts
//! - `identities` / `phone_challenges`: backing tables of the local identity provider

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{
    AccountRepository,
    BookingRepository,
    IdentityRepository,
    ProfileRepository,
};
pub use traits::{AccountStorage, BookingStorage, ProfileStorage};
