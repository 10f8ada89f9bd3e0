//! # REST API for Authentication
//!
//! Customer sign-up, the two-step phone login, sign-out and the current session.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{info, warn};

use super::body::JsonBody;
use super::error::ApiError;
use super::gate::MaybeSession;
use super::mappers::IdentityMapper;
use crate::domain::commands::account::{SignUpCommand, VerifyPhoneCommand};
use crate::AppState;
use shared::{
    PhoneChallengeRequest, PhoneChallengeResponse, Route, SignOutResponse, SignUpRequest, VerifyOtpRequest,
};

/// Create a customer account and sign it in
pub async fn sign_up(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignUpRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/signup - email: {}", request.email);

    let command = SignUpCommand {
        email: request.email,
        password: request.password,
        confirm_password: request.confirm_password,
        name: request.name,
        phone: request.phone,
    };

    match state.account_service.sign_up(command).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(IdentityMapper::to_auth_response(session, Route::Home)),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to sign up: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// Send a one-time passcode to a phone number
pub async fn start_phone_login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PhoneChallengeRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/phone/challenge");

    match state.account_service.start_phone_login(&request.phone_number).await {
        Ok(challenge_id) => (StatusCode::OK, Json(PhoneChallengeResponse { challenge_id })).into_response(),
        Err(e) => {
            warn!("Failed to start phone login: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// Confirm the passcode and sign the phone identity in
pub async fn verify_phone_login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VerifyOtpRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/phone/verify - challenge: {}", request.challenge_id);

    let command = VerifyPhoneCommand {
        challenge_id: request.challenge_id,
        code: request.code,
    };

    match state.account_service.verify_phone_login(command).await {
        Ok(session) => (
            StatusCode::OK,
            Json(IdentityMapper::to_auth_response(session, Route::Dashboard)),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to verify phone login: {}", e);
            ApiError(e).into_response()
        }
    }
}

pub async fn sign_out(State(state): State<AppState>, MaybeSession(session): MaybeSession) -> impl IntoResponse {
    info!("POST /api/auth/signout");

    if let Some(session) = session {
        state.account_service.sign_out(&session.token).await;
    }

    (
        StatusCode::OK,
        Json(SignOutResponse {
            success_message: "You have been signed out".to_string(),
        }),
    )
}

pub async fn current_session(MaybeSession(session): MaybeSession) -> impl IntoResponse {
    info!("GET /api/auth/session");

    (StatusCode::OK, Json(IdentityMapper::to_session_response(session)))
}
