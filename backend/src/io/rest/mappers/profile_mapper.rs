//! backend/src/io/rest/mappers/profile_mapper.rs

use crate::domain::commands::profile::CreateProfileCommand;
use crate::domain::models::{Availability, HandymanProfile as DomainProfile};
use shared::{
    Availability as SharedAvailability, CreateHandymanProfileRequest, HandymanDetailsResponse,
    HandymanListResponse, HandymanProfile as SharedProfile,
};

/// Mapper to convert between shared profile DTOs and domain profiles.
pub struct ProfileMapper;

impl ProfileMapper {
    pub fn availability_to_dto(domain: Option<&Availability>) -> SharedAvailability {
        let availability = domain.cloned().unwrap_or_else(Availability::unset);
        SharedAvailability {
            days: availability.days,
            start_time: availability.start_time.as_ref().map(Availability::format_time),
            end_time: availability.end_time.as_ref().map(Availability::format_time),
        }
    }

    /// Converts a domain profile to the wire DTO. A missing availability
    /// record becomes the empty one.
    pub fn to_dto(domain: DomainProfile) -> SharedProfile {
        SharedProfile {
            availability: Self::availability_to_dto(domain.availability.as_ref()),
            id: domain.id,
            user_id: domain.user_id,
            email: domain.email,
            name: domain.name,
            experience: domain.experience,
            hourly_rate: domain.hourly_rate,
            bio: domain.bio,
            location: domain.location,
            skills: domain.skills,
            is_available: domain.is_available,
            rating: domain.rating,
            reviews: domain.reviews,
            created_at: domain.created_at.map(|t| t.to_rfc3339()),
        }
    }

    pub fn to_list_dto(domain: Vec<DomainProfile>) -> HandymanListResponse {
        HandymanListResponse {
            handymen: domain.into_iter().map(Self::to_dto).collect(),
        }
    }

    /// Detail view: booking is offered only while the handyman is available
    pub fn to_details_dto(domain: DomainProfile) -> HandymanDetailsResponse {
        let availability_text = Availability::summary(domain.availability.as_ref());
        let bookable = domain.is_available;
        HandymanDetailsResponse {
            handyman: Self::to_dto(domain),
            bookable,
            availability_text,
        }
    }

    pub fn to_create_command(request: CreateHandymanProfileRequest) -> CreateProfileCommand {
        CreateProfileCommand {
            name: request.name,
            experience: request.experience,
            hourly_rate: request.hourly_rate,
            skills: request.skills,
            bio: request.bio,
            location: request.location,
            is_available: request.is_available,
            availability: request.availability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::Weekday;

    fn profile(availability: Option<Availability>, is_available: bool) -> DomainProfile {
        DomainProfile {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            email: Some("u1@example.com".to_string()),
            name: Some("Alice".to_string()),
            experience: Some(5.0),
            hourly_rate: Some(40.0),
            bio: "Twenty years fixing pipes".to_string(),
            location: "Springfield".to_string(),
            skills: Some(vec!["plumbing".to_string()]),
            availability,
            is_available,
            rating: 0.0,
            reviews: 0,
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_to_dto_formats_times() {
        let dto = ProfileMapper::to_dto(profile(Some(Availability::default_hours()), true));

        assert_eq!(dto.availability.start_time.as_deref(), Some("09:00"));
        assert_eq!(dto.availability.end_time.as_deref(), Some("17:00"));
        assert_eq!(dto.created_at.as_deref(), Some("2026-03-01T12:00:00+00:00"));
    }

    #[test]
    fn test_details_for_unavailable_handyman() {
        let details = ProfileMapper::to_details_dto(profile(None, false));

        assert!(!details.bookable);
        assert_eq!(details.availability_text, "Availability not set");
        assert!(details.handyman.availability.days.is_empty());
        assert!(details.handyman.availability.start_time.is_none());
    }

    #[test]
    fn test_details_summary() {
        let availability = Availability {
            days: vec![Weekday::Tuesday],
            ..Availability::default_hours()
        };
        let details = ProfileMapper::to_details_dto(profile(Some(availability), true));

        assert!(details.bookable);
        assert_eq!(details.availability_text, "Available on Tuesday from 09:00 to 17:00");
    }
}
