use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::commands::directory::{CategoryFilter, DirectoryQuery, DirectoryScope};
use crate::domain::errors::DomainError;
use crate::domain::models::HandymanProfile;
use crate::storage::traits::ProfileStorage;

/// Categories offered by the dashboard filter; "all" is the no-filter sentinel
pub const SKILL_CATEGORIES: [&str; 6] = ["all", "plumbing", "electrical", "carpentry", "painting", "cleaning"];

/// Listing and filtering of handyman profiles.
///
/// The full candidate set is fetched in one read and filtered in memory;
/// results keep the order the store returned them in.
#[derive(Clone)]
pub struct DirectoryService {
    profiles: Arc<dyn ProfileStorage>,
}

impl DirectoryService {
    pub fn new(profiles: Arc<dyn ProfileStorage>) -> Self {
        Self { profiles }
    }

    pub fn categories(&self) -> Vec<String> {
        SKILL_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    /// Fetch the profiles in scope and apply the search term and category
    pub async fn list_handymen(&self, query: DirectoryQuery) -> Result<Vec<HandymanProfile>, DomainError> {
        info!(
            "Listing handymen: scope={:?}, search={:?}, category={:?}",
            query.scope, query.search, query.category
        );

        let available_only = query.scope == DirectoryScope::AvailableOnly;
        let profiles = self.profiles.list_profiles(available_only).await.map_err(|e| {
            error!("Error fetching handymen: {:?}", e);
            DomainError::remote("Error loading handymen. Please try again later.", e)
        })?;

        let fetched = profiles.len();
        let filtered = filter_profiles(profiles, &query.search, &query.category);

        info!("Directory returned {} of {} handymen", filtered.len(), fetched);
        Ok(filtered)
    }
}

/// Keep the profiles matching both the search term and the category, in input order
pub fn filter_profiles(
    profiles: Vec<HandymanProfile>,
    search: &str,
    category: &CategoryFilter,
) -> Vec<HandymanProfile> {
    profiles
        .into_iter()
        .filter(|profile| matches_category(profile, category) && matches_term(profile, search))
        .collect()
}

/// Case-insensitive substring match against the name or any skill.
///
/// A blank term matches every profile. A missing name or skill list simply
/// does not match.
pub fn matches_term(profile: &HandymanProfile, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }

    let needle = term.to_lowercase();

    let name_matches = profile
        .name
        .as_ref()
        .map(|name| name.to_lowercase().contains(&needle))
        .unwrap_or(false);

    let skill_matches = profile
        .skills
        .as_ref()
        .map(|skills| skills.iter().any(|skill| skill.to_lowercase().contains(&needle)))
        .unwrap_or(false);

    debug!(
        "Profile {} term {:?}: name={}, skill={}",
        profile.id, term, name_matches, skill_matches
    );
    name_matches || skill_matches
}

/// Exact tag match; `CategoryFilter::All` accepts everything
pub fn matches_category(profile: &HandymanProfile, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Tag(tag) => profile.has_skill(tag),
    }
}
