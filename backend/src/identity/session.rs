use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::Identity;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A signed-in identity bound to its bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

/// Published on the hub's channel whenever a session starts or ends
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    SignedIn(Identity),
    SignedOut(Identity),
}

/// Owner of all live sessions.
///
/// Handlers resolve the caller's session from the hub per request; interested
/// parties follow sign-ins and sign-outs through [`SessionHub::subscribe`].
#[derive(Clone)]
pub struct SessionHub {
    sessions: Arc<RwLock<HashMap<String, Identity>>>,
    changes: broadcast::Sender<SessionChange>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    /// Start a session for an identity and return it with a fresh token
    pub async fn sign_in(&self, identity: Identity) -> Session {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(token.clone(), identity.clone());

        info!("Session started for {}", identity.uid);
        // No subscribers is not an error
        let _ = self.changes.send(SessionChange::SignedIn(identity.clone()));

        Session { token, identity }
    }

    pub async fn resolve(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let identity = sessions.get(token)?.clone();
        debug!("Resolved session for {}", identity.uid);
        Some(Session {
            token: token.to_string(),
            identity,
        })
    }

    /// End a session; returns the identity that was signed out
    pub async fn sign_out(&self, token: &str) -> Option<Identity> {
        let identity = self.sessions.write().await.remove(token)?;

        info!("Session ended for {}", identity.uid);
        let _ = self.changes.send(SessionChange::SignedOut(identity.clone()));

        Some(identity)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}
