//! # Domain Module
//!
//! Business logic of the handyman marketplace. Nothing here knows about HTTP
//! or SQL: services work against the storage traits and receive the caller's
//! [`Session`](crate::identity::Session) explicitly.
//!
//! ## Module Organization
//!
//! - **directory_service**: listing plus the search-term / category filter
//! - **profile_service**: handyman profile submission and lookup
//! - **booking_service**: booking submission, the caller's booking list and cancel
//! - **booking_board**: per-entry write state of the caller's booking list
//! - **account_service**: customer sign-up, phone login, sign-out
//! - **identity_gate**: the check in front of the protected screens
//!
//! ## Business Rules
//!
//! - Validation happens before any remote call and never writes on failure
//! - A booking starts `pending`; the only transition is to `cancelled`
//! - Display names are copied onto bookings at creation and never refreshed
//! - Duplicate profiles, double cancels and role checks are governed by
//!   [`AppConfig`](crate::config::AppConfig) policies

pub mod account_service;
pub mod booking_board;
pub mod booking_service;
pub mod commands;
pub mod directory_service;
pub mod errors;
pub mod identity_gate;
pub mod models;
pub mod profile_service;

pub use account_service::AccountService;
pub use booking_board::{BoardEntry, BookingBoard};
pub use booking_service::BookingService;
pub use directory_service::{DirectoryService, SKILL_CATEGORIES};
pub use errors::DomainError;
pub use identity_gate::{GateDecision, IdentityGate};
pub use profile_service::ProfileService;
