//! # REST API for the Handyman Directory
//!
//! The two listing screens and the category list.
//!
//! - `/handymen`: available handymen only, free-text search
//! - `/dashboard`: every handyman, free-text search plus a category tag

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::ApiError;
use super::mappers::ProfileMapper;
use crate::domain::commands::directory::{CategoryFilter, DirectoryQuery, DirectoryScope};
use crate::AppState;
use shared::CategoryListResponse;

// Query parameters for the listing screens
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryParams {
    pub search: Option<String>,
    pub skill: Option<String>,
}

/// List available handymen matching the search term
pub async fn list_handymen(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> impl IntoResponse {
    info!("GET /api/handymen - query: {:?}", params);

    let query = DirectoryQuery {
        scope: DirectoryScope::AvailableOnly,
        search: params.search.unwrap_or_default(),
        category: CategoryFilter::All,
    };

    match state.directory_service.list_handymen(query).await {
        Ok(profiles) => (StatusCode::OK, Json(ProfileMapper::to_list_dto(profiles))).into_response(),
        Err(e) => {
            warn!("Failed to list handymen: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// List all handymen matching the search term and selected category
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> impl IntoResponse {
    info!("GET /api/dashboard - query: {:?}", params);

    let query = DirectoryQuery {
        scope: DirectoryScope::All,
        category: CategoryFilter::parse(params.skill.as_deref()),
        search: params.search.unwrap_or_default(),
    };

    match state.directory_service.list_handymen(query).await {
        Ok(profiles) => (StatusCode::OK, Json(ProfileMapper::to_list_dto(profiles))).into_response(),
        Err(e) => {
            warn!("Failed to load dashboard: {}", e);
            ApiError(e).into_response()
        }
    }
}

pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    (
        StatusCode::OK,
        Json(CategoryListResponse {
            categories: state.directory_service.categories(),
        }),
    )
}
