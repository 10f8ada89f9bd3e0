// Repository modules
pub mod account_repository;
pub mod booking_repository;
pub mod identity_repository;
pub mod profile_repository;

// Re-export repository types
pub use account_repository::AccountRepository;
pub use booking_repository::BookingRepository;
pub use identity_repository::{is_unique_violation, IdentityRepository, PhoneChallenge, StoredIdentity};
pub use profile_repository::ProfileRepository;
