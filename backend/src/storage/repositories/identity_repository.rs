use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use crate::storage::connection::DbConnection;

/// Credential record kept by the local identity provider
#[derive(Debug, Clone, PartialEq)]
pub struct StoredIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
    pub password_salt: Option<String>,
}

/// Outstanding one-time-passcode challenge
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneChallenge {
    pub id: String,
    pub phone: String,
    pub code: String,
    /// Wrong codes submitted so far
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

/// True when the error came from a UNIQUE constraint on insert
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

/// Repository for identities and phone challenges
#[derive(Clone)]
pub struct IdentityRepository {
    db: DbConnection,
}

impl IdentityRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_identity(row: &SqliteRow) -> StoredIdentity {
        StoredIdentity {
            uid: row.get("uid"),
            email: row.get("email"),
            phone: row.get("phone"),
            display_name: row.get("display_name"),
            password_hash: row.get("password_hash"),
            password_salt: row.get("password_salt"),
        }
    }

    pub async fn insert_identity(&self, identity: &StoredIdentity) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO identities (uid, email, phone, display_name, password_hash, password_salt)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&identity.uid)
        .bind(&identity.email)
        .bind(&identity.phone)
        .bind(&identity.display_name)
        .bind(&identity.password_hash)
        .bind(&identity.password_salt)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredIdentity>> {
        let row = sqlx::query(
            "SELECT uid, email, phone, display_name, password_hash, password_salt FROM identities WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_identity))
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<StoredIdentity>> {
        let row = sqlx::query(
            "SELECT uid, email, phone, display_name, password_hash, password_salt FROM identities WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::row_to_identity))
    }

    /// Store a new challenge, replacing any still open for the same phone
    pub async fn store_challenge(&self, challenge: &PhoneChallenge) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM phone_challenges WHERE phone = ?")
            .bind(&challenge.phone)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO phone_challenges (id, phone, code, attempts, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&challenge.id)
            .bind(&challenge.phone)
            .bind(&challenge.code)
            .bind(challenge.attempts as i64)
            .bind(challenge.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_challenge(&self, challenge_id: &str) -> Result<Option<PhoneChallenge>> {
        let row = sqlx::query("SELECT id, phone, code, attempts, created_at FROM phone_challenges WHERE id = ?")
            .bind(challenge_id)
            .fetch_optional(self.db.pool())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let created_at: String = row.get("created_at");
        let attempts: i64 = row.get("attempts");
        Ok(Some(PhoneChallenge {
            id: row.get("id"),
            phone: row.get("phone"),
            code: row.get("code"),
            attempts: attempts.max(0) as u32,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("Invalid challenge timestamp: {}", created_at))?,
        }))
    }

    /// Count one wrong code against the challenge; returns the new total
    pub async fn record_failed_attempt(&self, challenge_id: &str) -> Result<u32> {
        let attempts: Option<i64> = sqlx::query_scalar(
            "UPDATE phone_challenges SET attempts = attempts + 1 WHERE id = ? RETURNING attempts",
        )
        .bind(challenge_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(attempts.unwrap_or_default().max(0) as u32)
    }

    pub async fn delete_challenge(&self, challenge_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM phone_challenges WHERE id = ?")
            .bind(challenge_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Drop challenges created before the cutoff; returns how many were removed
    pub async fn delete_challenges_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let rows = sqlx::query("SELECT id, created_at FROM phone_challenges")
            .fetch_all(self.db.pool())
            .await?;

        let mut removed = 0;
        for row in rows {
            let created_at: String = row.get("created_at");
            let stale = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc) < cutoff)
                .unwrap_or(true);
            if stale {
                let id: String = row.get("id");
                self.delete_challenge(&id).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
