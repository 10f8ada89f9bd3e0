//! # REST API for Bookings
//!
//! Booking submission from the handyman detail screen, plus the caller's
//! booking list and its single mutation, cancel.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{info, warn};

use super::body::JsonBody;
use super::error::ApiError;
use super::gate::{BookingsScreen, Caller, MaybeSession};
use super::mappers::BookingMapper;
use crate::AppState;
use shared::{CreateBookingRequest, CreateBookingResponse, Route};

/// Request a booking with a handyman
pub async fn create_booking(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Path(handyman_id): Path<String>,
    JsonBody(request): JsonBody<CreateBookingRequest>,
) -> impl IntoResponse {
    info!("POST /api/handymen/{}/bookings - request: {:?}", handyman_id, request);

    let command = match BookingMapper::to_create_command(handyman_id, request) {
        Ok(command) => command,
        Err(e) => return ApiError(e).into_response(),
    };

    match state.booking_service.submit_booking(session.as_ref(), command).await {
        Ok(result) => {
            let response = CreateBookingResponse {
                booking: BookingMapper::to_dto(result.booking),
                redirect_to: Route::Bookings.path(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Failed to create booking: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// List the caller's bookings
pub async fn list_bookings(State(state): State<AppState>, caller: Caller<BookingsScreen>) -> impl IntoResponse {
    info!("GET /api/bookings");

    match state.booking_service.list_bookings(&caller.session).await {
        Ok(board) => (StatusCode::OK, Json(BookingMapper::to_list_dto(board))).into_response(),
        Err(e) => {
            warn!("Failed to list bookings: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// Cancel one of the caller's bookings.
///
/// A failed store write is still a 200: the body carries the `failed`
/// transition and the unchanged list.
pub async fn cancel_booking(
    State(state): State<AppState>,
    caller: Caller<BookingsScreen>,
    Path(booking_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/bookings/{}/cancel", booking_id);

    match state.booking_service.cancel_booking(&caller.session, &booking_id).await {
        Ok(result) => (StatusCode::OK, Json(BookingMapper::to_cancel_dto(result))).into_response(),
        Err(e) => {
            warn!("Failed to cancel booking {}: {}", booking_id, e);
            ApiError(e).into_response()
        }
    }
}
