//! # Identity Module
//!
//! Authentication collaborators of the marketplace:
//! - **provider**: creates identities (email + password) and runs the phone
//!   one-time-passcode challenge
//! - **otp**: delivery of passcodes to the user's phone
//! - **session**: the session hub mapping bearer tokens to identities and
//!   broadcasting sign-in / sign-out changes
//!
//! Nothing here is read from ambient state: request handlers resolve a
//! [`Session`] from the hub and pass it explicitly to the domain services.

pub mod otp;
pub mod provider;
pub mod session;

pub use otp::{LogOtpDelivery, OtpDelivery};
pub use provider::{IdentityProvider, LocalIdentityProvider, ProviderError};
pub use session::{Session, SessionChange, SessionHub};

/// An authenticated user as known to the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: Option<String>,
}
