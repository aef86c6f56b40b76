//! Auth session state machine.
//!
//! `Initializing` until the stored token has been read once, then
//! `Authenticated` or `Anonymous`. Every transition is broadcast as a
//! `SessionEvent` so open dashboard tabs can refresh themselves.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use smartremedy_common::Result;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

use crate::storage::KeyValueStore;
use crate::theme::Theme;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "meu_dash_auth_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Initializing,
    Anonymous,
    Authenticated,
}

/// Events pushed to every open tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    /// The backend answered 401; the stored token is gone.
    AuthExpired,
    ThemeChanged { theme: Theme },
    /// A report was added or deleted.
    ReportsChanged,
}

struct Inner {
    initialized: bool,
    token: Option<SecretString>,
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    inner: RwLock<Inner>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            inner: RwLock::new(Inner { initialized: false, token: None }),
            events,
        }
    }

    /// Read the stored token once. Storage failures leave the session anonymous.
    pub async fn initialize(&self) -> AuthState {
        let token = match self.store.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                error!(error = %e, "failed to read auth token from storage");
                None
            }
        };

        let mut inner = self.inner.write().await;
        inner.token = token.map(SecretString::from);
        inner.initialized = true;
        let state = state_of(&inner);
        info!(?state, "session initialised");
        state
    }

    pub async fn state(&self) -> AuthState {
        state_of(&*self.inner.read().await)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await == AuthState::Authenticated
    }

    /// `Bearer <token>` when a token is present.
    pub async fn authorization_header(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }

    /// Persist a freshly issued token and become authenticated.
    pub async fn login(&self, token: String) -> Result<()> {
        self.store.set(TOKEN_KEY, &token).await?;
        {
            let mut inner = self.inner.write().await;
            inner.token = Some(SecretString::from(token));
            inner.initialized = true;
        }
        info!("admin session started");
        self.publish(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Drop the token. The in-memory session is cleared even when removing
    /// it from storage fails.
    pub async fn logout(&self) -> Result<()> {
        self.clear_token().await;
        info!("admin session ended");
        self.publish(SessionEvent::LoggedOut);
        self.store.remove(TOKEN_KEY).await
    }

    /// Called when the backend rejects the token.
    pub async fn invalidate(&self) {
        self.clear_token().await;
        if let Err(e) = self.store.remove(TOKEN_KEY).await {
            error!(error = %e, "failed to remove rejected token from storage");
        }
        warn!("backend rejected the auth token, session reset");
        self.publish(SessionEvent::AuthExpired);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Broadcast an event; having no listeners is fine.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    async fn clear_token(&self) {
        let mut inner = self.inner.write().await;
        inner.token = None;
        inner.initialized = true;
    }
}

fn state_of(inner: &Inner) -> AuthState {
    match (inner.initialized, inner.token.is_some()) {
        (false, _) => AuthState::Initializing,
        (true, true) => AuthState::Authenticated,
        (true, false) => AuthState::Anonymous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(std::io::Error::other("disk on fire").into())
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(std::io::Error::other("disk on fire").into())
        }
        async fn remove(&self, _key: &str) -> Result<()> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    #[tokio::test]
    async fn starts_initializing_then_reads_stored_token() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "jwt-123")]));
        let session = Session::new(store);
        assert_eq!(session.state().await, AuthState::Initializing);

        assert_eq!(session.initialize().await, AuthState::Authenticated);
        assert_eq!(session.authorization_header().await.as_deref(), Some("Bearer jwt-123"));
    }

    #[tokio::test]
    async fn empty_storage_means_anonymous() {
        let session = Session::new(Arc::new(MemoryStore::new()));
        assert_eq!(session.initialize().await, AuthState::Anonymous);
        assert_eq!(session.authorization_header().await, None);
    }

    #[tokio::test]
    async fn storage_failure_still_finishes_initialising() {
        let session = Session::new(Arc::new(BrokenStore));
        assert_eq!(session.initialize().await, AuthState::Anonymous);
    }

    #[tokio::test]
    async fn login_persists_and_logout_removes() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        session.initialize().await;
        let mut events = session.subscribe();

        session.login("jwt-abc".to_string()).await.unwrap();
        assert!(session.is_authenticated().await);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("jwt-abc"));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);

        session.logout().await.unwrap();
        assert_eq!(session.state().await, AuthState::Anonymous);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn failed_login_persistence_keeps_session_anonymous() {
        let session = Session::new(Arc::new(BrokenStore));
        session.initialize().await;
        assert!(session.login("jwt".to_string()).await.is_err());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn invalidate_clears_token_and_broadcasts() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "stale")]));
        let session = Session::new(store.clone());
        session.initialize().await;
        let mut events = session.subscribe();

        session.invalidate().await;
        assert!(!session.is_authenticated().await);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::AuthExpired);
    }

    #[test]
    fn events_serialise_with_type_tag() {
        let json = serde_json::to_string(&SessionEvent::ThemeChanged { theme: Theme::Light }).unwrap();
        assert_eq!(json, r#"{"type":"theme_changed","theme":"light"}"#);
        let json = serde_json::to_string(&SessionEvent::AuthExpired).unwrap();
        assert_eq!(json, r#"{"type":"auth_expired"}"#);
    }
}
