use async_trait::async_trait;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::otp::OtpDelivery;
use super::Identity;
use crate::storage::repositories::{is_unique_violation, IdentityRepository, PhoneChallenge, StoredIdentity};

const MIN_PASSWORD_LENGTH: usize = 6;

/// How long a delivered passcode stays valid
pub const CHALLENGE_TTL_MINUTES: i64 = 5;
/// Wrong codes allowed before the challenge is closed
pub const MAX_CODE_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Email already in use")]
    EmailInUse,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password should be at least 6 characters")]
    WeakPassword,
    #[error("Invalid phone number")]
    InvalidPhoneNumber,
    #[error("Invalid one-time passcode")]
    InvalidCode,
    #[error("One-time passcode expired")]
    CodeExpired,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// External identity provider used for sign-up and login
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an email + password identity
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, ProviderError>;

    /// Send a passcode to the phone and return the challenge ID
    async fn start_phone_challenge(&self, phone: &str) -> Result<String, ProviderError>;

    /// Confirm a passcode; returns the phone's identity, creating it on first login
    async fn confirm_phone_challenge(&self, challenge_id: &str, code: &str) -> Result<Identity, ProviderError>;
}

/// Identity provider backed by the service's own database
#[derive(Clone)]
pub struct LocalIdentityProvider {
    repository: IdentityRepository,
    delivery: Arc<dyn OtpDelivery>,
}

impl LocalIdentityProvider {
    pub fn new(repository: IdentityRepository, delivery: Arc<dyn OtpDelivery>) -> Self {
        Self { repository, delivery }
    }

    fn hash_password(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn generate_code() -> String {
        format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000)
    }

    /// E.164: a leading '+' followed by 8 to 15 digits
    fn is_valid_phone(phone: &str) -> bool {
        match phone.strip_prefix('+') {
            Some(digits) => (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()),
            None => false,
        }
    }

    /// Map a failed identity insert; a UNIQUE hit means another sign-up won the race
    fn insert_error(e: anyhow::Error) -> ProviderError {
        if is_unique_violation(&e) {
            ProviderError::EmailInUse
        } else {
            ProviderError::Backend(e.context("Failed to store identity"))
        }
    }

    fn to_identity(stored: StoredIdentity) -> Identity {
        Identity {
            uid: stored.uid,
            email: stored.email,
            phone: stored.phone,
            display_name: stored.display_name,
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, ProviderError> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(ProviderError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ProviderError::WeakPassword);
        }
        if self.repository.find_by_email(&email).await?.is_some() {
            warn!("Account creation rejected, email already registered: {}", email);
            return Err(ProviderError::EmailInUse);
        }

        let salt = Uuid::new_v4().simple().to_string();
        let stored = StoredIdentity {
            uid: Uuid::new_v4().simple().to_string(),
            email: Some(email),
            phone: None,
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            password_hash: Some(Self::hash_password(&salt, password)),
            password_salt: Some(salt),
        };

        if let Err(e) = self.repository.insert_identity(&stored).await {
            let err = Self::insert_error(e);
            if matches!(err, ProviderError::EmailInUse) {
                warn!("Account creation lost race for email: {}", stored.email.as_deref().unwrap_or_default());
            }
            return Err(err);
        }

        info!("Created identity {}", stored.uid);
        Ok(Self::to_identity(stored))
    }

    async fn start_phone_challenge(&self, phone: &str) -> Result<String, ProviderError> {
        let phone = phone.trim();
        if !Self::is_valid_phone(phone) {
            return Err(ProviderError::InvalidPhoneNumber);
        }

        let now = Utc::now();
        let purged = self
            .repository
            .delete_challenges_before(now - Duration::minutes(CHALLENGE_TTL_MINUTES))
            .await?;
        if purged > 0 {
            info!("Purged {} expired phone challenges", purged);
        }

        let challenge = PhoneChallenge {
            id: Uuid::new_v4().simple().to_string(),
            phone: phone.to_string(),
            code: Self::generate_code(),
            attempts: 0,
            created_at: now,
        };
        self.repository.store_challenge(&challenge).await?;
        self.delivery.deliver(&challenge.phone, &challenge.code).await?;

        info!("Started phone challenge {} for {}", challenge.id, challenge.phone);
        Ok(challenge.id)
    }

    async fn confirm_phone_challenge(&self, challenge_id: &str, code: &str) -> Result<Identity, ProviderError> {
        let challenge = self
            .repository
            .get_challenge(challenge_id)
            .await?
            .ok_or(ProviderError::InvalidCode)?;

        if Utc::now() - challenge.created_at > Duration::minutes(CHALLENGE_TTL_MINUTES) {
            warn!("Expired passcode for challenge {}", challenge_id);
            self.repository.delete_challenge(challenge_id).await?;
            return Err(ProviderError::CodeExpired);
        }

        if challenge.code != code.trim() {
            let attempts = self.repository.record_failed_attempt(challenge_id).await?;
            warn!("Wrong passcode for challenge {} ({}/{})", challenge_id, attempts, MAX_CODE_ATTEMPTS);
            if attempts >= MAX_CODE_ATTEMPTS {
                warn!("Closing challenge {} after {} wrong codes", challenge_id, attempts);
                self.repository.delete_challenge(challenge_id).await?;
            }
            return Err(ProviderError::InvalidCode);
        }

        self.repository.delete_challenge(challenge_id).await?;

        if let Some(existing) = self.repository.find_by_phone(&challenge.phone).await? {
            return Ok(Self::to_identity(existing));
        }

        let stored = StoredIdentity {
            uid: Uuid::new_v4().simple().to_string(),
            email: None,
            phone: Some(challenge.phone),
            display_name: None,
            password_hash: None,
            password_salt: None,
        };
        self.repository.insert_identity(&stored).await?;

        info!("Created phone identity {}", stored.uid);
        Ok(Self::to_identity(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::otp::RecordingOtpDelivery;
    use crate::storage::DbConnection;

    async fn setup_test() -> (LocalIdentityProvider, Arc<RecordingOtpDelivery>, IdentityRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repository = IdentityRepository::new(db);
        let delivery = Arc::new(RecordingOtpDelivery::default());
        let provider = LocalIdentityProvider::new(repository.clone(), delivery.clone());
        (provider, delivery, repository)
    }

    #[tokio::test]
    async fn test_create_account() {
        let (provider, _, repository) = setup_test().await;

        let identity = provider
            .create_account("Carl@Example.com", "secret1", Some("Carl"))
            .await
            .unwrap();

        assert_eq!(identity.email.as_deref(), Some("carl@example.com"));
        assert_eq!(identity.display_name.as_deref(), Some("Carl"));

        let stored = repository.find_by_email("carl@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash.as_deref(), Some("secret1"));
    }

    #[tokio::test]
    async fn test_create_account_rejections() {
        let (provider, _, _) = setup_test().await;

        assert!(matches!(
            provider.create_account("no-at-sign", "secret1", None).await,
            Err(ProviderError::InvalidEmail)
        ));
        assert!(matches!(
            provider.create_account("carl@example.com", "123", None).await,
            Err(ProviderError::WeakPassword)
        ));

        provider.create_account("carl@example.com", "secret1", None).await.unwrap();
        assert!(matches!(
            provider.create_account("carl@example.com", "secret2", None).await,
            Err(ProviderError::EmailInUse)
        ));
    }

    #[tokio::test]
    async fn test_phone_challenge_round() {
        let (provider, delivery, _) = setup_test().await;

        let challenge_id = provider.start_phone_challenge("+15550001111").await.unwrap();
        let code = delivery.last_code_for("+15550001111").expect("Code should be delivered");
        assert_eq!(code.len(), 6);

        let identity = provider.confirm_phone_challenge(&challenge_id, &code).await.unwrap();
        assert_eq!(identity.phone.as_deref(), Some("+15550001111"));
        assert!(identity.display_name.is_none());

        // The challenge is consumed
        assert!(matches!(
            provider.confirm_phone_challenge(&challenge_id, &code).await,
            Err(ProviderError::InvalidCode)
        ));

        // A second login with the same phone resolves to the same identity
        let second_id = provider.start_phone_challenge("+15550001111").await.unwrap();
        let second_code = delivery.last_code_for("+15550001111").unwrap();
        let again = provider.confirm_phone_challenge(&second_id, &second_code).await.unwrap();
        assert_eq!(again.uid, identity.uid);
    }

    #[tokio::test]
    async fn test_wrong_code_keeps_challenge_open() {
        let (provider, delivery, _) = setup_test().await;

        let challenge_id = provider.start_phone_challenge("+15550002222").await.unwrap();
        let code = delivery.last_code_for("+15550002222").unwrap();

        for _ in 1..MAX_CODE_ATTEMPTS {
            assert!(matches!(
                provider.confirm_phone_challenge(&challenge_id, wrong_code(&code)).await,
                Err(ProviderError::InvalidCode)
            ));
        }
        assert!(provider.confirm_phone_challenge(&challenge_id, &code).await.is_ok());
    }

    fn wrong_code(code: &str) -> &'static str {
        if code == "000000" {
            "111111"
        } else {
            "000000"
        }
    }

    #[tokio::test]
    async fn test_lost_sign_up_race_maps_to_email_in_use() {
        let (provider, _, repository) = setup_test().await;

        provider.create_account("carl@example.com", "secret1", None).await.unwrap();

        // Same email inserted after the lookup said it was free
        let racing = StoredIdentity {
            uid: "racing-uid".to_string(),
            email: Some("carl@example.com".to_string()),
            phone: None,
            display_name: None,
            password_hash: None,
            password_salt: None,
        };
        let err = repository.insert_identity(&racing).await.unwrap_err();
        assert!(matches!(LocalIdentityProvider::insert_error(err), ProviderError::EmailInUse));
        assert!(matches!(
            LocalIdentityProvider::insert_error(anyhow::anyhow!("disk full")),
            ProviderError::Backend(_)
        ));
    }

    #[tokio::test]
    async fn test_challenge_locks_after_max_wrong_codes() {
        let (provider, delivery, repository) = setup_test().await;

        let challenge_id = provider.start_phone_challenge("+15550003333").await.unwrap();
        let code = delivery.last_code_for("+15550003333").unwrap();

        for _ in 0..MAX_CODE_ATTEMPTS {
            assert!(matches!(
                provider.confirm_phone_challenge(&challenge_id, wrong_code(&code)).await,
                Err(ProviderError::InvalidCode)
            ));
        }

        // The right code no longer opens a locked challenge
        assert!(repository.get_challenge(&challenge_id).await.unwrap().is_none());
        assert!(matches!(
            provider.confirm_phone_challenge(&challenge_id, &code).await,
            Err(ProviderError::InvalidCode)
        ));
    }

    #[tokio::test]
    async fn test_expired_challenge_is_rejected() {
        let (provider, _, repository) = setup_test().await;

        let stale = PhoneChallenge {
            id: "stale".to_string(),
            phone: "+15550004444".to_string(),
            code: "123456".to_string(),
            attempts: 0,
            created_at: Utc::now() - Duration::minutes(CHALLENGE_TTL_MINUTES + 1),
        };
        repository.store_challenge(&stale).await.unwrap();

        assert!(matches!(
            provider.confirm_phone_challenge("stale", "123456").await,
            Err(ProviderError::CodeExpired)
        ));
        assert!(repository.get_challenge("stale").await.unwrap().is_none());
        assert!(repository.find_by_phone("+15550004444").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resend_closes_earlier_challenge() {
        let (provider, delivery, _) = setup_test().await;

        let first_id = provider.start_phone_challenge("+15550005555").await.unwrap();
        let first_code = delivery.last_code_for("+15550005555").unwrap();
        let second_id = provider.start_phone_challenge("+15550005555").await.unwrap();
        let second_code = delivery.last_code_for("+15550005555").unwrap();

        assert!(matches!(
            provider.confirm_phone_challenge(&first_id, &first_code).await,
            Err(ProviderError::InvalidCode)
        ));
        assert!(provider.confirm_phone_challenge(&second_id, &second_code).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_phone_number() {
        let (provider, _, _) = setup_test().await;

        for phone in ["", "5550001111", "+1-555-000", "+12"] {
            assert!(
                matches!(provider.start_phone_challenge(phone).await, Err(ProviderError::InvalidPhoneNumber)),
                "{} should be rejected",
                phone
            );
        }
    }
}
