use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::{Availability, HandymanProfile};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ProfileStorage;

const PROFILE_COLUMNS: &str = "id, user_id, email, name, experience, hourly_rate, bio, location, \
     skills, availability, is_available, rating, reviews, created_at";

/// Repository for handyman profile documents
#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn encode_availability(availability: &Availability) -> Result<String> {
        let stored = shared::Availability {
            days: availability.days.clone(),
            start_time: availability.start_time.as_ref().map(Availability::format_time),
            end_time: availability.end_time.as_ref().map(Availability::format_time),
        };
        serde_json::to_string(&stored).context("Failed to encode availability")
    }

    fn decode_availability(raw: &str) -> Result<Availability> {
        let stored: shared::Availability =
            serde_json::from_str(raw).context("Failed to decode availability")?;
        Ok(Availability {
            days: stored.days,
            start_time: stored.start_time.as_deref().and_then(Availability::parse_time),
            end_time: stored.end_time.as_deref().and_then(Availability::parse_time),
        })
    }

    fn row_to_profile(row: &SqliteRow) -> Result<HandymanProfile> {
        let skills = row
            .get::<Option<String>, _>("skills")
            .map(|raw| serde_json::from_str::<Vec<String>>(&raw))
            .transpose()
            .context("Failed to decode skills")?;

        let availability = row
            .get::<Option<String>, _>("availability")
            .map(|raw| Self::decode_availability(&raw))
            .transpose()?;

        let created_at = row
            .get::<Option<String>, _>("created_at")
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(HandymanProfile {
            id: row.get("id"),
            user_id: row.get("user_id"),
            email: row.get("email"),
            name: row.get("name"),
            experience: row.get("experience"),
            hourly_rate: row.get("hourly_rate"),
            bio: row.get("bio"),
            location: row.get("location"),
            skills,
            availability,
            is_available: row.get("is_available"),
            rating: row.get("rating"),
            reviews: row.get::<i64, _>("reviews").max(0) as u32,
            created_at,
        })
    }
}

#[async_trait]
impl ProfileStorage for ProfileRepository {
    async fn store_profile(&self, profile: &HandymanProfile) -> Result<()> {
        let skills = profile
            .skills
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("Failed to encode skills")?;
        let availability = profile
            .availability
            .as_ref()
            .map(Self::encode_availability)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO handymen (id, user_id, email, name, experience, hourly_rate, bio, location,
                                  skills, availability, is_available, rating, reviews, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.user_id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.experience)
        .bind(profile.hourly_rate)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(skills)
        .bind(availability)
        .bind(profile.is_available)
        .bind(profile.rating)
        .bind(profile.reviews as i64)
        .bind(profile.created_at.map(|dt| dt.to_rfc3339()))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<HandymanProfile>> {
        let row = sqlx::query(&format!("SELECT {} FROM handymen WHERE id = ?", PROFILE_COLUMNS))
            .bind(profile_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn list_profiles(&self, available_only: bool) -> Result<Vec<HandymanProfile>> {
        let rows = if available_only {
            sqlx::query(&format!(
                "SELECT {} FROM handymen WHERE is_available = TRUE ORDER BY ROWID",
                PROFILE_COLUMNS
            ))
            .fetch_all(self.db.pool())
            .await?
        } else {
            sqlx::query(&format!("SELECT {} FROM handymen ORDER BY ROWID", PROFILE_COLUMNS))
                .fetch_all(self.db.pool())
                .await?
        };

        rows.iter().map(Self::row_to_profile).collect()
    }

    async fn list_profiles_by_owner(&self, user_id: &str) -> Result<Vec<HandymanProfile>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM handymen WHERE user_id = ? ORDER BY ROWID",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_profile).collect()
    }
}
