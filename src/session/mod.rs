//! Session store: the single piece of shared state in the client.
//!
//! The store is created `Uninitialized`, hydrated once from storage, and then
//! moves between `Authenticated` and `Anonymous` through login, register,
//! logout and forced expiry.

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{LoginResponse, User};
use crate::storage::{Storage, TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) token: String,
    pub(crate) user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionState {
    Uninitialized,
    Authenticated(Session),
    Anonymous,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to persist session: {0:#}")]
    Storage(anyhow::Error),
}

impl SessionError {
    /// Message to show under a login/register form.
    pub(crate) fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.server_message().unwrap_or(fallback).to_string(),
            Self::Storage(_) => fallback.to_string(),
        }
    }
}

pub(crate) struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub(crate) fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            state: RwLock::new(SessionState::Uninitialized),
            storage,
        }
    }

    /// Reads the persisted keys. A token without a readable user record
    /// counts as no session.
    pub(crate) fn hydrate(&self) -> anyhow::Result<()> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self
            .storage
            .get(USER_KEY)?
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable persisted user");
                    None
                }
            });

        let next = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                SessionState::Authenticated(Session { token, user })
            }
            _ => SessionState::Anonymous,
        };
        tracing::debug!(authenticated = matches!(next, SessionState::Authenticated(_)), "Session hydrated");
        *self.state.write() = next;
        Ok(())
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(*self.state.read(), SessionState::Uninitialized)
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), SessionState::Authenticated(_))
    }

    pub(crate) fn token(&self) -> Option<String> {
        match &*self.state.read() {
            SessionState::Authenticated(s) => Some(s.token.clone()),
            _ => None,
        }
    }

    pub(crate) fn user(&self) -> Option<User> {
        match &*self.state.read() {
            SessionState::Authenticated(s) => Some(s.user.clone()),
            _ => None,
        }
    }

    pub(crate) async fn login(
        &self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let resp = api::auth::login(client, email, password).await?;
        self.establish(&resp).map_err(SessionError::Storage)
    }

    pub(crate) async fn register(
        &self,
        client: &ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let resp = api::auth::register(client, name, email, password).await?;
        self.establish(&resp).map_err(SessionError::Storage)
    }

    /// Persists token and user together, then swaps the in-memory state.
    pub(crate) fn establish(&self, resp: &LoginResponse) -> anyhow::Result<User> {
        let user = resp.user();
        let user_json = serde_json::to_string(&user)?;
        let mut state = self.state.write();
        self.storage
            .set_many(&[(TOKEN_KEY, resp.token.as_str()), (USER_KEY, user_json.as_str())])?;
        *state = SessionState::Authenticated(Session {
            token: resp.token.clone(),
            user: user.clone(),
        });
        tracing::info!(user_id = user.id, "Session established");
        Ok(user)
    }

    pub(crate) fn logout(&self) -> anyhow::Result<()> {
        let mut state = self.state.write();
        self.storage.remove_many(&[TOKEN_KEY, USER_KEY])?;
        *state = SessionState::Anonymous;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Server-signaled invalidation. Returns true only for the call that
    /// actually moved the session to `Anonymous`; a response carrying a token
    /// other than the current one is stale and leaves the session alone.
    pub(crate) fn expire(&self, token_used: Option<&str>) -> bool {
        let mut state = self.state.write();
        match &*state {
            SessionState::Anonymous => return false,
            SessionState::Authenticated(s) if token_used.is_some_and(|t| t != s.token) => {
                tracing::debug!("Ignoring auth failure from a replaced session");
                return false;
            }
            _ => {}
        }
        if let Err(e) = self.storage.remove_many(&[TOKEN_KEY, USER_KEY]) {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }
        *state = SessionState::Anonymous;
        tracing::warn!("Session expired by server");
        true
    }
}
