//! # REST API Interface Layer
//!
//! HTTP endpoints of the marketplace. Each screen of the front-end maps to one
//! or two endpoints; responses that end a flow carry `redirect_to` naming the
//! next screen.
//!
//! This layer only translates: JSON DTOs to domain commands, the bearer token
//! to a [`Session`](crate::identity::Session), and [`DomainError`](crate::domain::DomainError)
//! to status codes via [`ApiError`].

pub mod auth_apis;
pub mod body;
pub mod booking_apis;
pub mod directory_apis;
pub mod error;
pub mod gate;
pub mod mappers;
pub mod profile_apis;

pub use body::JsonBody;
pub use error::ApiError;
