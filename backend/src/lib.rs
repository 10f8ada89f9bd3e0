//! # Handyman Backend
//!
//! Non-UI logic of the handyman booking marketplace.
//!
//! This crate brings together:
//! - **Domain**: directory query, profile and booking submission, booking
//!   management and the identity gate
//! - **Storage**: document collections behind async traits, SQLite by default
//! - **Identity**: identity provider, passcode delivery and the session hub
//! - **IO**: the axum REST API consumed by the front-end
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, gate extractor)
//!     ↓
//! Domain Layer (services, rules)
//!     ↓
//! Storage / Identity (repositories, provider, sessions)
//! ```

pub mod config;
pub mod domain;
pub mod identity;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{AccountService, BookingService, DirectoryService, IdentityGate, ProfileService};
use crate::identity::{LocalIdentityProvider, LogOtpDelivery, OtpDelivery, SessionHub};
use crate::io::rest::{auth_apis, booking_apis, directory_apis, profile_apis};
use crate::storage::{AccountRepository, BookingRepository, DbConnection, IdentityRepository, ProfileRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub directory_service: DirectoryService,
    pub profile_service: ProfileService,
    pub booking_service: BookingService,
    pub gate: IdentityGate,
    pub sessions: SessionHub,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    Ok(build_state(db, Arc::new(LogOtpDelivery), config))
}

/// Wire services over an open database and a passcode delivery
pub fn build_state(db: DbConnection, delivery: Arc<dyn OtpDelivery>, config: &AppConfig) -> AppState {
    info!("Setting up domain model");
    let profiles = Arc::new(ProfileRepository::new(db.clone()));
    let bookings = Arc::new(BookingRepository::new(db.clone()));
    let accounts = Arc::new(AccountRepository::new(db.clone()));
    let provider = Arc::new(LocalIdentityProvider::new(IdentityRepository::new(db), delivery));
    let sessions = SessionHub::new();

    info!(
        "Policies: profiles={:?}, cancel={:?}, roles={:?}",
        config.profile_policy, config.cancel_policy, config.role_enforcement
    );

    AppState {
        account_service: AccountService::new(provider, accounts.clone(), sessions.clone()),
        directory_service: DirectoryService::new(profiles.clone()),
        profile_service: ProfileService::new(profiles.clone(), config.profile_policy),
        booking_service: BookingService::new(bookings, profiles.clone(), config.cancel_policy),
        gate: IdentityGate::new(config.role_enforcement, accounts, profiles),
        sessions,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    // CORS setup to allow the front-end to make requests
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/auth/signup", post(auth_apis::sign_up))
        .route("/auth/phone/challenge", post(auth_apis::start_phone_login))
        .route("/auth/phone/verify", post(auth_apis::verify_phone_login))
        .route("/auth/signout", post(auth_apis::sign_out))
        .route("/auth/session", get(auth_apis::current_session))
        .route(
            "/handymen",
            get(directory_apis::list_handymen).post(profile_apis::create_profile),
        )
        .route("/handymen/:handyman_id", get(profile_apis::get_handyman))
        .route("/handymen/:handyman_id/bookings", post(booking_apis::create_booking))
        .route("/dashboard", get(directory_apis::dashboard))
        .route("/categories", get(directory_apis::list_categories))
        .route("/handyman-profile", get(profile_apis::own_profiles))
        .route("/bookings", get(booking_apis::list_bookings))
        .route("/bookings/:booking_id/cancel", post(booking_apis::cancel_booking));

    let mut router = Router::new().nest("/api", api_routes);
    if let Some(static_dir) = &config.static_dir {
        info!("Serving front-end from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
