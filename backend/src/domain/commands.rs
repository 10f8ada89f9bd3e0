//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod directory {
    /// Which profiles are fetched from the store before filtering
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DirectoryScope {
        /// Store-side pre-filter on the "currently available" flag
        AvailableOnly,
        All,
    }

    /// Category selection on the dashboard; "all" disables the filter
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CategoryFilter {
        All,
        Tag(String),
    }

    impl CategoryFilter {
        pub fn parse(value: Option<&str>) -> Self {
            match value.map(str::trim) {
                None | Some("") | Some("all") => CategoryFilter::All,
                Some(tag) => CategoryFilter::Tag(tag.to_string()),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct DirectoryQuery {
        pub scope: DirectoryScope,
        pub search: String,
        pub category: CategoryFilter,
    }
}

pub mod profile {
    use shared::Availability as AvailabilityInput;

    /// Input for creating a new handyman profile
    #[derive(Debug, Clone, Default)]
    pub struct CreateProfileCommand {
        pub name: Option<String>,
        pub experience: Option<f64>,
        pub hourly_rate: Option<f64>,
        pub skills: Vec<String>,
        pub bio: Option<String>,
        pub location: Option<String>,
        pub is_available: Option<bool>,
        pub availability: Option<AvailabilityInput>,
    }
}

pub mod booking {
    use chrono::{DateTime, Utc};
    use shared::CancelTransition;

    use crate::domain::booking_board::BookingBoard;
    use crate::domain::models::Booking;

    /// Input for requesting a booking with a handyman
    #[derive(Debug, Clone, Default)]
    pub struct CreateBookingCommand {
        pub handyman_id: String,
        pub date_time: Option<DateTime<Utc>>,
        pub description: Option<String>,
        pub address: Option<String>,
    }

    /// Result of creating a booking
    #[derive(Debug, Clone)]
    pub struct CreateBookingResult {
        pub booking: Booking,
    }

    /// Result of a cancel attempt: the tagged outcome plus the caller's list after it
    #[derive(Debug, Clone)]
    pub struct CancelBookingResult {
        pub transition: CancelTransition,
        pub board: BookingBoard,
    }
}

pub mod account {
    /// Input for customer sign-up
    #[derive(Debug, Clone)]
    pub struct SignUpCommand {
        pub email: String,
        pub password: String,
        pub confirm_password: String,
        pub name: String,
        pub phone: String,
    }

    /// Second step of the phone login
    #[derive(Debug, Clone)]
    pub struct VerifyPhoneCommand {
        pub challenge_id: String,
        pub code: String,
    }
}

#[cfg(test)]
mod tests {
    use super::directory::CategoryFilter;

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(Some("all")), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(Some("  ")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(Some("plumbing")),
            CategoryFilter::Tag("plumbing".to_string())
        );
    }
}
