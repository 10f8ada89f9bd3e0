// Mapper modules
pub mod booking_mapper;
pub mod identity_mapper;
pub mod profile_mapper;

// Re-export mapper types
pub use booking_mapper::BookingMapper;
pub use identity_mapper::IdentityMapper;
pub use profile_mapper::ProfileMapper;
