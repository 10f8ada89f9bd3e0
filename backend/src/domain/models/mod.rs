pub mod account;
pub mod booking;
pub mod profile;

pub use account::{AccountRole, UserAccount};
pub use booking::{Booking, NewBooking, ANONYMOUS_CUSTOMER};
pub use profile::{Availability, HandymanProfile};
