//! # REST API for Handyman Profiles

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{info, warn};

use super::body::JsonBody;
use super::error::ApiError;
use super::gate::{Caller, HandymanProfileScreen, MaybeSession};
use super::mappers::ProfileMapper;
use crate::AppState;
use shared::{CreateHandymanProfileRequest, CreateHandymanProfileResponse, Route};

/// Create a handyman profile for the signed-in caller
pub async fn create_profile(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    JsonBody(request): JsonBody<CreateHandymanProfileRequest>,
) -> impl IntoResponse {
    info!("POST /api/handymen - request: {:?}", request);

    let command = ProfileMapper::to_create_command(request);
    match state.profile_service.create_profile(session.as_ref(), command).await {
        Ok(profile) => {
            let response = CreateHandymanProfileResponse {
                handyman: ProfileMapper::to_dto(profile),
                redirect_to: Route::Dashboard.path(),
                success_message: "Your handyman profile has been created!".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            warn!("Failed to create handyman profile: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// Get one handyman with the booking flag and availability summary
pub async fn get_handyman(State(state): State<AppState>, Path(handyman_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/handymen/{}", handyman_id);

    match state.profile_service.get_profile(&handyman_id).await {
        Ok(profile) => (StatusCode::OK, Json(ProfileMapper::to_details_dto(profile))).into_response(),
        Err(e) => {
            warn!("Failed to get handyman {}: {}", handyman_id, e);
            ApiError(e).into_response()
        }
    }
}

/// Profiles owned by the caller
pub async fn own_profiles(State(state): State<AppState>, caller: Caller<HandymanProfileScreen>) -> impl IntoResponse {
    info!("GET /api/handyman-profile");

    match state.profile_service.list_own_profiles(&caller.session).await {
        Ok(profiles) => (StatusCode::OK, Json(ProfileMapper::to_list_dto(profiles))).into_response(),
        Err(e) => {
            warn!("Failed to list own profiles: {}", e);
            ApiError(e).into_response()
        }
    }
}
