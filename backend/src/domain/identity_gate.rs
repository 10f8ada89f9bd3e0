use shared::Route;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::RoleEnforcement;
use crate::domain::errors::DomainError;
use crate::domain::models::AccountRole;
use crate::identity::Session;
use crate::storage::traits::{AccountStorage, ProfileStorage};

/// Outcome of evaluating the gate for one protected screen
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Admit(Session),
    Redirect(Route),
    Forbidden(String),
}

/// Guard in front of the protected screens.
///
/// Without a session the caller is sent to the login screen. Role checks are
/// applied only when enforcement is switched on.
#[derive(Clone)]
pub struct IdentityGate {
    role_enforcement: RoleEnforcement,
    accounts: Arc<dyn AccountStorage>,
    profiles: Arc<dyn ProfileStorage>,
}

impl IdentityGate {
    pub fn new(
        role_enforcement: RoleEnforcement,
        accounts: Arc<dyn AccountStorage>,
        profiles: Arc<dyn ProfileStorage>,
    ) -> Self {
        Self {
            role_enforcement,
            accounts,
            profiles,
        }
    }

    pub async fn admit(&self, session: Option<Session>, route: &Route) -> Result<GateDecision, DomainError> {
        let Some(session) = session else {
            debug!("No session for {}, redirecting to login", route);
            return Ok(GateDecision::Redirect(Route::Login));
        };

        if self.role_enforcement == RoleEnforcement::Unenforced || !route.is_protected() {
            return Ok(GateDecision::Admit(session));
        }

        let uid = session.identity.uid.clone();
        let allowed = match route {
            Route::Bookings => {
                let account = self.accounts.get_account_by_user(&uid).await.map_err(|e| {
                    error!("Error loading account for {}: {:?}", uid, e);
                    DomainError::remote("Error checking your account. Please try again.", e)
                })?;
                account.map(|a| a.role == AccountRole::Customer).unwrap_or(false)
            }
            Route::HandymanProfile => {
                let owned = self.profiles.list_profiles_by_owner(&uid).await.map_err(|e| {
                    error!("Error loading profiles for {}: {:?}", uid, e);
                    DomainError::remote("Error checking your account. Please try again.", e)
                })?;
                !owned.is_empty()
            }
            _ => true,
        };

        if allowed {
            Ok(GateDecision::Admit(session))
        } else {
            warn!("Identity {} is not allowed on {}", uid, route);
            Ok(GateDecision::Forbidden(match route {
                Route::Bookings => "Only customers can view bookings".to_string(),
                _ => "Only handymen can view this page".to_string(),
            }))
        }
    }
}
