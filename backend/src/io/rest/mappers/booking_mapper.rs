//! backend/src/io/rest/mappers/booking_mapper.rs

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::booking_board::{BoardEntry, BookingBoard};
use crate::domain::commands::booking::{CancelBookingResult, CreateBookingCommand};
use crate::domain::errors::DomainError;
use crate::domain::models::Booking as DomainBooking;
use shared::{
    Booking as SharedBooking, BookingEntry, BookingListResponse, CancelBookingResponse, CreateBookingRequest,
};

/// Formats accepted for the requested date-time, after RFC 3339
const LOCAL_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Mapper to convert between shared booking DTOs and domain bookings.
pub struct BookingMapper;

impl BookingMapper {
    pub fn to_dto(domain: DomainBooking) -> SharedBooking {
        SharedBooking {
            id: domain.id,
            handyman_id: domain.handyman_id,
            handyman_name: domain.handyman_name,
            customer_id: domain.customer_id,
            customer_name: domain.customer_name,
            date_time: domain.date_time.to_rfc3339(),
            description: domain.description,
            address: domain.address,
            status: domain.status,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn entry_to_dto(entry: BoardEntry) -> BookingEntry {
        BookingEntry {
            can_cancel: entry.can_cancel(),
            write_state: entry.write_state,
            error: entry.error,
            booking: Self::to_dto(entry.booking),
        }
    }

    pub fn to_list_dto(board: BookingBoard) -> BookingListResponse {
        BookingListResponse {
            bookings: board.into_entries().into_iter().map(Self::entry_to_dto).collect(),
        }
    }

    pub fn to_cancel_dto(result: CancelBookingResult) -> CancelBookingResponse {
        CancelBookingResponse {
            transition: result.transition,
            bookings: Self::to_list_dto(result.board).bookings,
        }
    }

    /// Parse a requested date-time. RFC 3339 is taken as is; a bare
    /// `YYYY-MM-DDTHH:MM[:SS]` is read as UTC.
    pub fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        LOCAL_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    /// Build the domain command. A blank date-time counts as missing; one that
    /// does not parse is rejected here.
    pub fn to_create_command(
        handyman_id: String,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingCommand, DomainError> {
        let date_time = match request.date_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Self::parse_date_time(raw)
                    .ok_or_else(|| DomainError::validation("Please select a valid date and time"))?,
            ),
        };

        Ok(CreateBookingCommand {
            handyman_id,
            date_time,
            description: request.description,
            address: request.address,
        })
    }
}
