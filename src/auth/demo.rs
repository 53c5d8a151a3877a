//! Development-mode shortcut: built-in identities that sign in without the API.
//!
//! Only compiled with the `demo-accounts` feature and only consulted when
//! `ClientOptions::demo_accounts` is set. Never enable it for production builds.

use chrono::Utc;
use serde_json::Map;

use super::session::Session;
use super::types::{Credentials, Role, User};

/// One built-in identity
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
    pub first_name: &'static str,
    pub last_name: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "admin@fleet.com",
        password: "admin123",
        role: Role::Admin,
        first_name: "Admin",
        last_name: "User",
    },
    DemoAccount {
        email: "user@fleet.com",
        password: "user123",
        role: Role::User,
        first_name: "Fleet",
        last_name: "User",
    },
    DemoAccount {
        email: "warehouse@fleet.com",
        password: "warehouse123",
        role: Role::Warehouse,
        first_name: "Warehouse",
        last_name: "Manager",
    },
];

/// What a login attempt looks like against the demo table
#[derive(Debug, Clone, PartialEq)]
pub enum DemoLogin {
    /// Not a demo address; use the real endpoint
    NotDemo,
    /// Demo address with the wrong password
    WrongPassword,
    /// Matched; a synthetic session
    Session(Session),
}

/// Look up `email` in the demo table
pub fn find(email: &str) -> Option<&'static DemoAccount> {
    DEMO_ACCOUNTS.iter().find(|account| account.email == email)
}

/// Check `credentials` against the demo table, fabricating a session on a match
pub fn authenticate(credentials: &Credentials) -> DemoLogin {
    let Some(account) = find(&credentials.email) else {
        return DemoLogin::NotDemo;
    };
    if account.password != credentials.password {
        return DemoLogin::WrongPassword;
    }

    let token = format!(
        "demo_token_{}_{}",
        account.role.as_str(),
        Utc::now().timestamp_millis()
    );
    DemoLogin::Session(Session::new(token, account.user()))
}

impl DemoAccount {
    /// The user object a demo login produces
    pub fn user(&self) -> User {
        User {
            id: Some(format!("demo-{}", self.role.as_str())),
            object_id: None,
            email: self.email.to_string(),
            first_name: Some(self.first_name.to_string()),
            last_name: Some(self.last_name.to_string()),
            role: self.role.as_str().to_string(),
            extra: Map::new(),
        }
    }
}
