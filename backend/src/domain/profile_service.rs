use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ProfilePolicy;
use crate::domain::commands::profile::CreateProfileCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::{Availability, HandymanProfile};
use crate::identity::Session;
use crate::storage::traits::ProfileStorage;

const LOGIN_REQUIRED: &str = "Please log in to sign up as a handyman";
const REQUIRED_FIELDS: &str = "Please fill in all required fields";

/// Creation and lookup of handyman profiles
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStorage>,
    policy: ProfilePolicy,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStorage>, policy: ProfilePolicy) -> Self {
        Self { profiles, policy }
    }

    /// Validate the form and insert a new profile owned by the caller.
    ///
    /// Authentication is checked again here even though the screen is
    /// reachable only after login. Nothing is written when validation fails.
    pub async fn create_profile(
        &self,
        session: Option<&Session>,
        command: CreateProfileCommand,
    ) -> Result<HandymanProfile, DomainError> {
        let session = session.ok_or_else(|| {
            warn!("Profile creation rejected: no session");
            DomainError::Unauthenticated(LOGIN_REQUIRED.to_string())
        })?;
        info!("Creating handyman profile for {}", session.identity.uid);

        let name = command
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let skills: Vec<String> = command
            .skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect();

        let (Some(name), Some(experience), Some(hourly_rate)) = (name, command.experience, command.hourly_rate)
        else {
            warn!("Profile creation rejected: missing name, experience or hourly rate");
            return Err(DomainError::validation(REQUIRED_FIELDS));
        };
        if skills.is_empty() {
            warn!("Profile creation rejected: no skills given");
            return Err(DomainError::validation(REQUIRED_FIELDS));
        }

        let availability = match command.availability {
            Some(input) => Self::parse_availability(input)?,
            None => Availability::default_hours(),
        };

        if self.policy == ProfilePolicy::OnePerIdentity {
            let existing = self
                .profiles
                .list_profiles_by_owner(&session.identity.uid)
                .await
                .map_err(|e| {
                    error!("Error checking existing profiles: {:?}", e);
                    DomainError::remote("Error creating your profile. Please try again.", e)
                })?;
            if !existing.is_empty() {
                warn!("Identity {} already has a handyman profile", session.identity.uid);
                return Err(DomainError::Conflict(
                    "You already have a handyman profile".to_string(),
                ));
            }
        }

        let profile = HandymanProfile {
            id: HandymanProfile::generate_id(),
            user_id: session.identity.uid.clone(),
            email: session.identity.email.clone(),
            name: Some(name),
            experience: Some(experience),
            hourly_rate: Some(hourly_rate),
            bio: command.bio.unwrap_or_default(),
            location: command.location.unwrap_or_default(),
            skills: Some(skills),
            availability: Some(availability),
            is_available: command.is_available.unwrap_or(true),
            rating: 0.0,
            reviews: 0,
            created_at: Some(Utc::now()),
        };

        self.profiles.store_profile(&profile).await.map_err(|e| {
            error!("Error storing handyman profile: {:?}", e);
            DomainError::remote("Error creating your profile. Please try again.", e)
        })?;

        info!("Created handyman profile {} for {}", profile.id, profile.user_id);
        Ok(profile)
    }

    pub async fn get_profile(&self, profile_id: &str) -> Result<HandymanProfile, DomainError> {
        info!("Getting handyman profile: {}", profile_id);

        let profile = self.profiles.get_profile(profile_id).await.map_err(|e| {
            error!("Error fetching handyman {}: {:?}", profile_id, e);
            DomainError::remote("Error loading handyman details", e)
        })?;

        match profile {
            Some(mut profile) => {
                if profile.availability.is_none() {
                    profile.availability = Some(Availability::unset());
                }
                Ok(profile)
            }
            None => {
                warn!("Handyman not found: {}", profile_id);
                Err(DomainError::NotFound("Handyman not found".to_string()))
            }
        }
    }

    /// Profiles created by the signed-in caller
    pub async fn list_own_profiles(&self, session: &Session) -> Result<Vec<HandymanProfile>, DomainError> {
        info!("Listing handyman profiles owned by {}", session.identity.uid);

        let profiles = self
            .profiles
            .list_profiles_by_owner(&session.identity.uid)
            .await
            .map_err(|e| {
                error!("Error fetching own profiles: {:?}", e);
                DomainError::remote("Error loading your profile. Please try again later.", e)
            })?;

        info!("Found {} profiles for {}", profiles.len(), session.identity.uid);
        Ok(profiles)
    }

    fn parse_availability(input: shared::Availability) -> Result<Availability, DomainError> {
        let parse = |value: Option<String>| -> Result<_, DomainError> {
            match value.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(raw) => Availability::parse_time(raw).map(Some).ok_or_else(|| {
                    warn!("Invalid availability time: {}", raw);
                    DomainError::validation(format!("Invalid time '{}', expected HH:MM", raw))
                }),
            }
        };

        Ok(Availability {
            days: input.days,
            start_time: parse(input.start_time)?,
            end_time: parse(input.end_time)?,
        })
    }
}
