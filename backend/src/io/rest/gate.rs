//! Request extractors that resolve the caller's session.
//!
//! Every request carries its session explicitly as `Authorization: Bearer
//! <token>`. [`MaybeSession`] resolves it when present; [`Caller`] runs the
//! identity gate for one protected screen and rejects the request otherwise.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use shared::Route;
use std::convert::Infallible;
use std::marker::PhantomData;
use tracing::debug;

use super::error::ApiError;
use crate::domain::{DomainError, GateDecision};
use crate::identity::Session;
use crate::AppState;

/// A screen that sits behind the identity gate
pub trait ProtectedScreen: Send + Sync + 'static {
    fn route() -> Route;
}

pub struct BookingsScreen;

impl ProtectedScreen for BookingsScreen {
    fn route() -> Route {
        Route::Bookings
    }
}

pub struct HandymanProfileScreen;

impl ProtectedScreen for HandymanProfileScreen {
    fn route() -> Route {
        Route::HandymanProfile
    }
}

pub fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// The caller's session, if the request carries a live token
pub struct MaybeSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = match bearer_token(parts) {
            Some(token) => state.sessions.resolve(&token).await,
            None => None,
        };
        if session.is_none() {
            debug!("Request without a live session");
        }
        Ok(MaybeSession(session))
    }
}

/// A session admitted by the identity gate for screen `S`
pub struct Caller<S: ProtectedScreen> {
    pub session: Session,
    screen: PhantomData<S>,
}

#[async_trait]
impl<S: ProtectedScreen> FromRequestParts<AppState> for Caller<S> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeSession(session) = match MaybeSession::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };

        match state.gate.admit(session, &S::route()).await? {
            GateDecision::Admit(session) => Ok(Caller {
                session,
                screen: PhantomData,
            }),
            GateDecision::Redirect(route) => {
                debug!("Gate redirected {} to {}", S::route(), route);
                Err(ApiError(DomainError::Unauthenticated(
                    "Please log in to continue".to_string(),
                )))
            }
            GateDecision::Forbidden(message) => Err(ApiError(DomainError::Forbidden(message))),
        }
    }
}
