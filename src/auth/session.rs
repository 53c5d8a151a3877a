//! Session management for authentication

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::navigator::{Navigator, Route, RouteState};
use super::storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
use super::types::User;
use crate::error::Result;

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,

    /// The signed-in user
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Where the session lifecycle currently stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// Startup check has not completed
    #[default]
    Unknown,
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Owner of the persisted token/user and the in-memory auth state.
///
/// Storage and state are only ever changed together under the state lock, so a
/// reader never sees `Authenticated` without a persisted token. One context is
/// shared by the HTTP client and the auth store of a single app instance.
pub struct SessionContext {
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<AuthState>,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn SessionStorage>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            storage,
            navigator,
            state: RwLock::new(AuthState::Unknown),
        }
    }

    /// Context over fresh memory storage and a recording navigator
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(RouteState::default()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// The persisted bearer token, if any
    pub fn token(&self) -> Option<String> {
        let _state = self.read();
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!("failed to read persisted token: {}", err);
                None
            }
        }
    }

    /// The persisted user object, if any and if it still parses
    pub fn persisted_user(&self) -> Option<User> {
        let _state = self.read();
        let raw = self.storage.get(USER_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("discarding unreadable persisted user: {}", err);
                None
            }
        }
    }

    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.read(), AuthState::Authenticated(_))
    }

    /// Persist `session` and move to `Authenticated`.
    ///
    /// If either key cannot be written both are removed again and the state is
    /// left untouched.
    pub fn establish(&self, session: Session) -> Result<()> {
        let mut state = self.write();
        let user_json = serde_json::to_string(&session.user)?;

        let written = self
            .storage
            .set(TOKEN_KEY, &session.token)
            .and_then(|_| self.storage.set(USER_KEY, &user_json));
        if let Err(err) = written {
            self.remove_keys();
            return Err(err);
        }

        info!("session established for {}", session.user.email);
        *state = AuthState::Authenticated(session.user);
        Ok(())
    }

    /// Replace the signed-in user, keeping the token
    pub fn update_user(&self, user: User) -> Result<()> {
        let mut state = self.write();
        if !matches!(*state, AuthState::Authenticated(_)) {
            return Ok(());
        }
        self.storage.set(USER_KEY, &serde_json::to_string(&user)?)?;
        *state = AuthState::Authenticated(user);
        Ok(())
    }

    /// Drop both persisted keys and move to `Anonymous`
    pub fn clear(&self) {
        let mut state = self.write();
        self.remove_keys();
        *state = AuthState::Anonymous;
    }

    /// The backend rejected the token: clear everything and go to the login view
    pub fn expire(&self) {
        info!("session rejected by server, returning to login");
        self.clear();
        self.navigator.navigate(Route::Login);
    }

    fn remove_keys(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!("failed to remove persisted {}: {}", key, err);
            }
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &*self.read())
            .finish_non_exhaustive()
    }
}
