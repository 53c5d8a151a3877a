//! Authentication and session lifecycle for the fleet console

#[cfg(feature = "demo-accounts")]
pub mod demo;
mod navigator;
mod session;
mod storage;
mod types;

use log::{info, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::ClientOptions;
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::fetch::HttpClient;
use crate::permissions::{PermissionSet, Permissions};

pub use navigator::*;
pub use session::*;
pub use storage::*;
pub use types::*;

/// Session/auth store: the single source of truth for who is signed in.
///
/// Moves `Unknown -> Anonymous | Authenticated(user)` through
/// [`initialize`](Self::initialize), [`login`](Self::login) and
/// [`logout`](Self::logout). Failures come back as an [`AuthResult`] rather
/// than an `Err`.
#[derive(Clone)]
pub struct AuthStore {
    http: HttpClient,
    session: Arc<SessionContext>,
    demo_accounts: bool,
}

impl AuthStore {
    /// Create a store sharing `http`'s session context
    pub fn new(http: HttpClient, options: &ClientOptions) -> Self {
        let session = http.session().clone();
        Self {
            http,
            session,
            demo_accounts: options.demo_accounts,
        }
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Permissions of the signed-in user's role; empty when signed out
    pub fn permissions(&self) -> PermissionSet {
        let user = self.session.current_user();
        Permissions::for_role(user.as_ref().map(|u| u.role.as_str()))
    }

    /// Startup check: validate a persisted token against `GET /auth/me`.
    ///
    /// Any failure clears storage and leaves the store `Anonymous`.
    pub async fn initialize(&self) -> AuthState {
        let Some(token) = self.session.token() else {
            self.session.clear();
            return AuthState::Anonymous;
        };

        #[cfg(feature = "demo-accounts")]
        if self.demo_accounts && token.starts_with("demo_token_") {
            if let Some(user) = self.session.persisted_user() {
                return self.restore(Session::new(token, user));
            }
        }

        match self.http.get("/auth/me").execute::<ApiResponse<Value>>().await {
            Ok(response) if response.success => {
                let user = response
                    .data
                    .as_ref()
                    .and_then(|data| AuthData::from_data(data).user)
                    .or_else(|| self.session.persisted_user());
                match user {
                    Some(user) => self.restore(Session::new(token, user)),
                    None => {
                        warn!("profile check succeeded without a user object");
                        self.session.clear();
                        AuthState::Anonymous
                    }
                }
            }
            Ok(response) => {
                info!(
                    "profile check rejected: {}",
                    response.message.unwrap_or_default()
                );
                self.session.clear();
                AuthState::Anonymous
            }
            Err(err) => {
                info!("profile check failed: {}", err);
                self.session.clear();
                AuthState::Anonymous
            }
        }
    }

    fn restore(&self, session: Session) -> AuthState {
        match self.session.establish(session) {
            Ok(()) => self.session.state(),
            Err(err) => {
                warn!("failed to persist restored session: {}", err);
                self.session.clear();
                AuthState::Anonymous
            }
        }
    }

    /// Sign in with email and password
    pub async fn login(&self, credentials: &Credentials) -> AuthResult {
        #[cfg(feature = "demo-accounts")]
        if self.demo_accounts {
            match demo::authenticate(credentials) {
                demo::DemoLogin::Session(session) => {
                    info!("demo login as {}", session.user.role);
                    let user = session.user.clone();
                    return match self.session.establish(session) {
                        Ok(()) => AuthResult::ok(Some(user), Some("Login successful".to_string())),
                        Err(err) => AuthResult::failed(err.user_message()),
                    };
                }
                demo::DemoLogin::WrongPassword => {
                    return AuthResult::failed("Invalid email or password");
                }
                demo::DemoLogin::NotDemo => {}
            }
        }

        match self.send("/auth/login", reqwest::Method::POST, json!(credentials)).await {
            Ok(response) if response.success => {
                let data = response.data.as_ref().map(AuthData::from_data).unwrap_or_default();
                match (data.token, data.user) {
                    (Some(token), Some(user)) => {
                        match self.session.establish(Session::new(token, user.clone())) {
                            Ok(()) => AuthResult::ok(Some(user), response.message),
                            Err(err) => AuthResult::failed(err.user_message()),
                        }
                    }
                    _ => AuthResult::failed("Login response did not include a session"),
                }
            }
            Ok(response) => {
                AuthResult::failed(response.message.unwrap_or_else(|| "Login failed".to_string()))
            }
            Err(err) => AuthResult::failed(err.user_message()),
        }
    }

    /// Sign out. The server call is best effort; local state is always cleared.
    pub async fn logout(&self) {
        if self.session.token().is_some() {
            if let Err(err) = self.http.post("/auth/logout").execute_raw().await {
                warn!("server logout failed, clearing local session anyway: {}", err);
            }
        }
        self.session.clear();
        info!("logged out");
    }

    /// Create an account; does not sign in
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult {
        let result = self.send("/auth/register", reqwest::Method::POST, json!(request)).await;
        match result {
            Ok(response) if response.success => {
                let user = response.data.as_ref().and_then(|d| AuthData::from_data(d).user);
                AuthResult::ok(user, response.message)
            }
            Ok(response) => AuthResult::failed(
                response.message.unwrap_or_else(|| "Registration failed".to_string()),
            ),
            Err(err) => AuthResult::failed(err.user_message()),
        }
    }

    /// Update the signed-in user's profile and replace the in-memory user
    pub async fn update_profile(&self, data: &Value) -> AuthResult {
        match self.send("/auth/profile", reqwest::Method::PUT, data.clone()).await {
            Ok(response) if response.success => {
                let user = response.data.as_ref().and_then(|d| AuthData::from_data(d).user);
                if let Some(user) = &user {
                    if let Err(err) = self.session.update_user(user.clone()) {
                        return AuthResult::failed(err.user_message());
                    }
                }
                AuthResult::ok(user, response.message)
            }
            Ok(response) => AuthResult::failed(
                response.message.unwrap_or_else(|| "Profile update failed".to_string()),
            ),
            Err(err) => AuthResult::failed(err.user_message()),
        }
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> AuthResult {
        self.passthrough("/auth/change-password", reqwest::Method::PUT, json!(request))
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> AuthResult {
        self.passthrough(
            "/auth/forgot-password",
            reqwest::Method::POST,
            json!({ "email": email }),
        )
        .await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> AuthResult {
        self.passthrough("/auth/reset-password", reqwest::Method::POST, json!(request))
            .await
    }

    /// Fetch the profile without touching session state
    pub async fn profile(&self) -> Result<ApiResponse<Value>> {
        self.http.get("/auth/me").execute().await
    }

    async fn send(
        &self,
        path: &str,
        method: reqwest::Method,
        body: Value,
    ) -> Result<ApiResponse<Value>> {
        self.http.request(method, path, Some(body), None).await
    }

    async fn passthrough(&self, path: &str, method: reqwest::Method, body: Value) -> AuthResult {
        match self.send(path, method, body).await {
            Ok(response) if response.success => AuthResult::ok(None, response.message),
            Ok(response) => AuthResult::failed(
                response.message.unwrap_or_else(|| "Request failed".to_string()),
            ),
            Err(err) => AuthResult::failed(err.user_message()),
        }
    }
}
