use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::commands::account::{SignUpCommand, VerifyPhoneCommand};
use crate::domain::errors::DomainError;
use crate::domain::models::{AccountRole, UserAccount};
use crate::identity::{Identity, IdentityProvider, ProviderError, Session, SessionHub};
use crate::storage::traits::AccountStorage;

const SIGN_UP_FAILED: &str = "Error creating account. Please try again.";
const OTP_SEND_FAILED: &str = "Error sending OTP. Please try again.";
const OTP_INVALID: &str = "Invalid OTP. Please try again.";
const OTP_EXPIRED: &str = "OTP expired. Please request a new one.";

/// Customer sign-up, phone login and session lifecycle
#[derive(Clone)]
pub struct AccountService {
    provider: Arc<dyn IdentityProvider>,
    accounts: Arc<dyn AccountStorage>,
    sessions: SessionHub,
}

impl AccountService {
    pub fn new(provider: Arc<dyn IdentityProvider>, accounts: Arc<dyn AccountStorage>, sessions: SessionHub) -> Self {
        Self {
            provider,
            accounts,
            sessions,
        }
    }

    /// Create an email identity plus its customer account and sign it in.
    ///
    /// The account document is written after the identity exists; a failed
    /// write leaves the identity in place.
    pub async fn sign_up(&self, command: SignUpCommand) -> Result<Session, DomainError> {
        info!("Signing up customer: {}", command.email);

        if command.password != command.confirm_password {
            warn!("Sign-up rejected: passwords do not match");
            return Err(DomainError::validation("Passwords do not match"));
        }
        if command.email.trim().is_empty() || command.password.is_empty() {
            warn!("Sign-up rejected: missing email or password");
            return Err(DomainError::validation("Please fill in all required fields"));
        }

        let name = command.name.trim().to_string();
        let identity = self
            .provider
            .create_account(&command.email, &command.password, Some(&name))
            .await
            .map_err(|e| match e {
                e @ ProviderError::EmailInUse => DomainError::Conflict(e.to_string()),
                e @ (ProviderError::InvalidEmail | ProviderError::WeakPassword) => DomainError::validation(e.to_string()),
                other => Self::remote(SIGN_UP_FAILED, other),
            })?;

        let account = UserAccount {
            id: UserAccount::generate_id(),
            user_id: identity.uid.clone(),
            email: identity.email.clone().unwrap_or_default(),
            name,
            phone: command.phone.trim().to_string(),
            role: AccountRole::Customer,
            created_at: Utc::now(),
        };
        self.accounts.store_account(&account).await.map_err(|e| {
            error!("Error storing account for {}: {:?}", identity.uid, e);
            DomainError::remote(SIGN_UP_FAILED, e)
        })?;

        info!("Created customer account {} for {}", account.id, identity.uid);
        Ok(self.sessions.sign_in(identity).await)
    }

    /// Send a passcode to the phone; returns the challenge to confirm
    pub async fn start_phone_login(&self, phone_number: &str) -> Result<String, DomainError> {
        info!("Starting phone login for {}", phone_number);

        self.provider
            .start_phone_challenge(phone_number)
            .await
            .map_err(|e| match e {
                ProviderError::InvalidPhoneNumber => {
                    warn!("Phone login rejected: invalid number {}", phone_number);
                    DomainError::validation(OTP_SEND_FAILED)
                }
                other => Self::remote(OTP_SEND_FAILED, other),
            })
    }

    pub async fn verify_phone_login(&self, command: VerifyPhoneCommand) -> Result<Session, DomainError> {
        info!("Verifying phone challenge {}", command.challenge_id);

        let identity = self
            .provider
            .confirm_phone_challenge(&command.challenge_id, &command.code)
            .await
            .map_err(|e| match e {
                ProviderError::InvalidCode => DomainError::validation(OTP_INVALID),
                ProviderError::CodeExpired => DomainError::validation(OTP_EXPIRED),
                other => Self::remote(OTP_INVALID, other),
            })?;

        Ok(self.sessions.sign_in(identity).await)
    }

    pub async fn sign_out(&self, token: &str) -> Option<Identity> {
        let identity = self.sessions.sign_out(token).await;
        if identity.is_none() {
            warn!("Sign-out for unknown session");
        }
        identity
    }

    pub async fn current_session(&self, token: &str) -> Option<Session> {
        self.sessions.resolve(token).await
    }

    fn remote(message: &str, e: ProviderError) -> DomainError {
        error!("Identity provider failure: {:?}", e);
        DomainError::remote(message, anyhow::Error::new(e))
    }
}
