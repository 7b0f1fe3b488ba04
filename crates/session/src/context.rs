//! The session context: who is signed in, shared explicitly with whoever
//! needs it instead of living in a global.

use std::sync::{Arc, Mutex, MutexGuard};

use bustix_auth::{UserInfo, get_user_info};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{
    EXPIRY_KEY, REFRESH_TOKEN_KEY, SessionStore, SessionStoreError, TOKEN_KEY, USER_INFO_KEY,
    clear_persisted_session,
};
use crate::SessionState;

/// What the backend returns from a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

/// Shared handle to the current session and its durable storage.
///
/// Cheap to clone; clones observe the same session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SessionState>,
    store: Arc<dyn SessionStore>,
}

impl core::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state();
        f.debug_struct("SessionContext")
            .field("signed_in", &state.is_signed_in())
            .field("expires_at", &state.expires_at)
            .field("expiry_notified", &state.expiry_notified)
            .finish()
    }
}

impl SessionContext {
    /// A signed-out session backed by `store`. Nothing is read from the store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState::default()),
                store,
            }),
        }
    }

    /// Restore the session persisted in `store` at process start.
    ///
    /// Expiry is recomputed from the token. A token without `exp` is restored
    /// as is and the monitor signs it out on its first tick.
    pub fn rehydrate(store: Arc<dyn SessionStore>) -> Result<Self, SessionStoreError> {
        let context = Self::new(store);

        let token = context
            .inner
            .store
            .get(TOKEN_KEY)?
            .filter(|t| !t.trim().is_empty());

        if let Some(token) = token {
            let expires_at = bustix_auth::expires_at(&token);

            tracing::info!(expires_at = ?expires_at, "rehydrated persisted session");
            let mut state = context.state();
            state.token = Some(token);
            state.expires_at = expires_at;
        }

        Ok(context)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    /// Begin a new session, replacing any current one.
    pub fn login(&self, response: LoginResponse) -> Result<(), SessionStoreError> {
        let LoginResponse {
            token,
            refresh_token,
            user,
        } = response;

        let expires_at = bustix_auth::expires_at(&token);
        let user = user.or_else(|| get_user_info(&token));

        let persisted = self.persist(&token, expires_at, refresh_token.as_deref(), user.as_ref());
        if let Err(err) = persisted {
            // Never leave a half-written session for the next start to pick up.
            *self.state() = SessionState::default();
            if let Err(clear_err) = clear_persisted_session(self.inner.store.as_ref()) {
                tracing::error!(error = %clear_err, "failed to clear partial session");
            }
            return Err(err);
        }

        tracing::info!(
            subject = user.as_ref().map(|u| u.id.as_str()).unwrap_or(""),
            expires_at = ?expires_at,
            "session started"
        );

        *self.state() = SessionState {
            token: Some(token),
            expires_at,
            expiry_notified: false,
        };
        Ok(())
    }

    fn persist(
        &self,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
        refresh_token: Option<&str>,
        user: Option<&UserInfo>,
    ) -> Result<(), SessionStoreError> {
        let store = &self.inner.store;

        store.set(TOKEN_KEY, token)?;
        match expires_at {
            Some(at) => store.set(EXPIRY_KEY, &at.to_rfc3339())?,
            None => store.remove(EXPIRY_KEY)?,
        }
        match refresh_token {
            Some(refresh) => store.set(REFRESH_TOKEN_KEY, refresh)?,
            None => store.remove(REFRESH_TOKEN_KEY)?,
        }
        match user {
            Some(user) => store.set(USER_INFO_KEY, &serde_json::to_string(user)?)?,
            None => store.remove(USER_INFO_KEY)?,
        }
        Ok(())
    }

    /// End the session at the user's request.
    pub fn logout(&self) -> Result<(), SessionStoreError> {
        *self.state() = SessionState::default();
        clear_persisted_session(self.inner.store.as_ref())?;
        tracing::info!("session ended by logout");
        Ok(())
    }

    /// Drop the session after it became invalid.
    ///
    /// In-memory state is cleared even if the store fails. The expiry-notice
    /// latch is left as is.
    pub fn invalidate(&self) -> Result<(), SessionStoreError> {
        {
            let mut state = self.state();
            state.token = None;
            state.expires_at = None;
        }
        clear_persisted_session(self.inner.store.as_ref())
    }

    /// Returns `true` the first time it is called in a session lifetime.
    pub fn latch_expiry_notice(&self) -> bool {
        let mut state = self.state();
        !core::mem::replace(&mut state.expiry_notified, true)
    }

    pub fn token(&self) -> Option<String> {
        self.state().token.clone().filter(|t| !t.trim().is_empty())
    }

    pub fn snapshot(&self) -> SessionState {
        self.state().clone()
    }

    /// Profile derived from the current token.
    pub fn user_info(&self) -> Option<UserInfo> {
        self.token().and_then(|t| get_user_info(&t))
    }

    /// Profile blob persisted at login (as sent by the backend, if it sent one).
    pub fn stored_user_info(&self) -> Result<Option<UserInfo>, SessionStoreError> {
        self.inner
            .store
            .get(USER_INFO_KEY)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(SessionStoreError::from)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, SessionStoreError> {
        self.inner.store.get(REFRESH_TOKEN_KEY)
    }
}
